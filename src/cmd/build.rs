//! Interactive configurator — `buildmate build`.

use anyhow::Result;
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use buildmate::client::HttpCompatibilityClient;
use buildmate::config::BuildmateConfig;
use buildmate::configurator::{Candidates, Configurator, Cursor};
use buildmate::pricing::Pricing;
use buildmate::session::BuildSession;
use buildmate::stage::Stage;
use buildmate::ui::icons::{CROSS, SEARCH, SPARKLE};
use buildmate::ui::{candidate_label, render_tabs, summary_lines, with_spinner};
use buildmate::wattage::WattageEstimate;

/// What a menu row does when chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Pick(i64),
    Search,
    ClearSearch,
    Retry,
    Back,
    Quit,
}

pub async fn cmd_build(config: &BuildmateConfig, stages: Vec<Stage>) -> Result<()> {
    let client = HttpCompatibilityClient::new(config.service_url(), config.service_timeout())?;
    let pricing = config.pricing().clone();
    let theme = ColorfulTheme::default();

    println!();
    println!(
        "{}{} {}",
        SPARKLE,
        style("PC BuildMate").bold(),
        style(format!("(parts from {})", client.base_url())).dim()
    );

    let mut session = if stages.is_empty() {
        with_spinner("Loading CPU options...", BuildSession::start(client)).await
    } else {
        let mut stages = stages;
        stages.sort();
        stages.dedup();
        with_spinner("Loading options...", BuildSession::with_stages(client, stages)).await?
    };

    loop {
        println!();
        let cfg = session.configurator();
        println!("{}", render_tabs(cfg.stages(), cfg.current_index()));
        println!();

        match session.cursor() {
            Cursor::Complete => {
                print_summary(cfg, &pricing);
                let choice = Select::with_theme(&theme)
                    .with_prompt("Build complete")
                    .items(&["Finish", "Change a part"])
                    .default(0)
                    .interact()?;
                if choice == 0 {
                    break;
                }
                if let Some(target) = pick_completed_stage(cfg, &theme)? {
                    let stage = cfg.stages()[target];
                    with_spinner(
                        format!("Loading {} options...", stage.label()),
                        session.rewind_to(target),
                    )
                    .await?;
                }
            }
            Cursor::Selecting(index) => {
                let stage = cfg.stages()[index];
                print_stage_header(cfg, stage);

                if matches!(cfg.candidates(), Candidates::Loading { .. } | Candidates::Idle) {
                    with_spinner(format!("Loading {} options...", stage.label()), session.refresh()).await;
                    continue;
                }

                let menu = build_menu(cfg, &pricing);
                let labels: Vec<&str> = menu.iter().map(|(label, _)| label.as_str()).collect();
                let choice = Select::with_theme(&theme)
                    .with_prompt(format!("Choose a {}", stage.label()))
                    .items(&labels)
                    .default(0)
                    .max_length(15)
                    .interact()?;

                match menu[choice].1 {
                    Action::Pick(id) => {
                        let loading = cfg
                            .stages()
                            .get(index + 1)
                            .map(|next| format!("Loading {} options...", next.label()))
                            .unwrap_or_else(|| "Finishing build...".to_string());
                        with_spinner(loading, session.select_candidate(id)).await?;
                    }
                    Action::Search => {
                        let text: String = Input::with_theme(&theme)
                            .with_prompt(format!("{}Search {}", SEARCH, stage.label()))
                            .allow_empty(true)
                            .interact_text()?;
                        session.set_filter(text.trim());
                    }
                    Action::ClearSearch => session.set_filter(""),
                    Action::Retry => {
                        with_spinner(format!("Retrying {}...", stage.label()), session.retry()).await?;
                    }
                    Action::Back => {
                        if let Some(target) = pick_completed_stage(cfg, &theme)? {
                            let stage = cfg.stages()[target];
                            with_spinner(
                                format!("Loading {} options...", stage.label()),
                                session.rewind_to(target),
                            )
                            .await?;
                        }
                    }
                    Action::Quit => {
                        if !cfg.selections().is_empty() {
                            print_summary(cfg, &pricing);
                        }
                        println!("{}", style("Build not finished.").dim());
                        return Ok(());
                    }
                }
            }
        }
    }

    println!("{}", style("Happy building!").green());
    Ok(())
}

/// Status line above the picker: search filter, PSU wattage floor, or the
/// stage's fetch error.
fn print_stage_header(cfg: &Configurator, stage: Stage) {
    if stage.needs_wattage()
        && let (Some(cpu), Some(gpu)) = (cfg.selection(Stage::Cpu), cfg.selection(Stage::Gpu))
    {
        let estimate = WattageEstimate::from_draws(cpu.power_draw(), gpu.power_draw());
        let note = if estimate.is_complete() {
            String::new()
        } else {
            format!(" {}", style("(power draw missing for some parts)").yellow())
        };
        println!("  Minimum PSU rating: {}W{}", style(estimate.required).bold(), note);
    }

    match cfg.candidates() {
        Candidates::Failed { message } => {
            println!("  {}{}", CROSS, style(format!("Could not load {} options", stage.label())).red());
            println!("  {}", style(message).dim());
        }
        Candidates::Ready(parts) if parts.is_empty() => {
            println!("  {}", style(format!("No compatible {} found.", stage.label())).yellow());
        }
        Candidates::Ready(_) if !cfg.filter().is_empty() => {
            let shown = cfg.filtered_candidates().len();
            println!(
                "  {}{} matching \"{}\"",
                SEARCH,
                shown,
                style(cfg.filter()).cyan()
            );
        }
        _ => {}
    }
}

/// Picker rows for the current stage: matching candidates, then actions.
fn build_menu(cfg: &Configurator, pricing: &Pricing) -> Vec<(String, Action)> {
    let mut menu = Vec::new();
    let can_go_back = cfg.current_index() > 0;

    match cfg.candidates() {
        Candidates::Failed { .. } => {
            menu.push(("Retry".to_string(), Action::Retry));
        }
        Candidates::Ready(parts) => {
            for part in cfg.filtered_candidates() {
                menu.push((candidate_label(part, pricing), Action::Pick(part.id)));
            }
            if !parts.is_empty() {
                menu.push(("Search parts...".to_string(), Action::Search));
            } else {
                menu.push(("Retry".to_string(), Action::Retry));
            }
            if !cfg.filter().is_empty() {
                menu.push(("Clear search".to_string(), Action::ClearSearch));
            }
        }
        Candidates::Loading { .. } | Candidates::Idle => {}
    }

    if can_go_back {
        menu.push(("Go back to an earlier stage".to_string(), Action::Back));
    }
    menu.push(("Quit".to_string(), Action::Quit));
    menu
}

/// Ask which completed stage to revisit. `None` when cancelled.
fn pick_completed_stage(cfg: &Configurator, theme: &ColorfulTheme) -> Result<Option<usize>> {
    let mut items: Vec<String> = cfg
        .selections()
        .iter()
        .map(|(stage, part)| format!("{:<12} {}", stage.label(), style(&part.name).dim()))
        .collect();
    if items.is_empty() {
        return Ok(None);
    }
    items.push("Cancel".to_string());

    let choice = Select::with_theme(theme)
        .with_prompt("Change which part? Later choices will be cleared")
        .items(&items)
        .default(0)
        .interact()?;

    Ok((choice < cfg.selections().len()).then_some(choice))
}

fn print_summary(cfg: &Configurator, pricing: &Pricing) {
    let summary = cfg.price_summary(pricing);
    for line in summary_lines(cfg.selections(), pricing, &summary) {
        println!("{}", line);
    }
    println!();
}
