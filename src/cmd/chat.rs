//! Chat assistants — `buildmate chat` and `buildmate recommend`.

use anyhow::Result;
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use std::io::Write;
use std::time::Duration;

use buildmate::chat::{ChatMode, ChatSession, OllamaChatClient, RecommendationProfile};
use buildmate::config::BuildmateConfig;
use buildmate::pricing::format_grouped;
use buildmate::ui::icons::{CLIPBOARD, ROBOT};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn cmd_chat(config: &BuildmateConfig, mode: ChatMode) -> Result<()> {
    let chat = config.chat();
    let backend = OllamaChatClient::new(&chat.endpoint, CONNECT_TIMEOUT)?;
    let prompt = chat.prompt_for(mode)?;
    let mut session = ChatSession::new(backend, mode, chat.model_for(mode), &prompt);
    let theme = ColorfulTheme::default();

    println!();
    println!("{}{}", ROBOT, style(intro(mode)).bold());
    println!(
        "{}",
        style(format!(
            "Model {} at {}. Type 'exit' to leave.",
            session.model(),
            chat.endpoint
        ))
        .dim()
    );
    println!();

    let mut shown_profile: Option<RecommendationProfile> = None;

    loop {
        let input: String = Input::with_theme(&theme)
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;
        let input = input.trim();
        if matches!(input, "exit" | "quit") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        print!("{}", ROBOT);
        let _ = std::io::stdout().flush();
        let result = session
            .send(input, |delta| {
                print!("{}", delta);
                let _ = std::io::stdout().flush();
            })
            .await;
        println!();

        if let Err(e) = result {
            if let Some(apology) = session.history().last() {
                println!("{}", style(&apology.content).red());
            }
            println!("{}", style(e).dim());
        }
        println!();

        if mode == ChatMode::Recommendation
            && let Some(profile) = session.latest_profile()
            && shown_profile.as_ref() != Some(&profile)
        {
            print_profile(&profile, &config.pricing().currency_symbol);
            shown_profile = Some(profile);
        }
    }

    Ok(())
}

fn intro(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::Beginner => "PC BuildMate: tell me what you need and I'll help you pick parts.",
        ChatMode::Recommendation => "Tell me how you'll use your next PC and I'll work out what it needs.",
    }
}

fn print_profile(profile: &RecommendationProfile, currency_symbol: &str) {
    for line in profile_lines(profile, currency_symbol) {
        println!("{}", line);
    }
    println!();
}

/// Human-readable digest of a requirement profile.
fn profile_lines(profile: &RecommendationProfile, currency_symbol: &str) -> Vec<String> {
    let prefs = &profile.technical_preferences;
    let prio = &profile.performance_priorities;

    let uses: Vec<String> = profile
        .use_cases
        .needed()
        .iter()
        .map(|(name, intensity)| format!("{} ({}/10)", name, intensity))
        .collect();

    vec![
        format!("{}{}", CLIPBOARD, style("Requirement profile").bold()),
        format!(
            "  Budget:      {}{}",
            currency_symbol,
            format_grouped(profile.budget)
        ),
        format!(
            "  Uses:        {}",
            if uses.is_empty() {
                "-".to_string()
            } else {
                uses.join(", ")
            }
        ),
        format!(
            "  Platform:    {} CPU, {} GPU, {}",
            or_dash(&prefs.cpu_platform),
            or_dash(&prefs.gpu_platform),
            or_dash(&prefs.form_factor)
        ),
        format!(
            "  Storage:     SSD {}, HDD {}",
            or_dash(&prefs.storage.ssd_capacity),
            or_dash(&prefs.storage.hdd_capacity)
        ),
        format!(
            "  Priorities:  CPU {}, GPU {}, RAM {}, storage speed {}",
            prio.cpu, prio.gpu, prio.ram, prio.storage_speed
        ),
    ]
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildmate::chat::extract_profile;

    #[test]
    fn test_profile_lines_digest() {
        let profile = extract_profile(
            r#"{"budget": 150000,
                "useCases": {"gaming": {"needed": true, "intensity": 9},
                             "streaming": {"needed": true, "intensity": 7}},
                "technicalPreferences": {"cpuPlatform": "AMD", "gpuPlatform": "NVIDIA",
                                         "storage": {"ssdCapacity": "2TB"}},
                "performancePriorities": {"cpu": 7, "gpu": 9, "ram": 6, "storageSpeed": 5}}"#,
        )
        .unwrap();

        let lines: Vec<String> = profile_lines(&profile, "₹")
            .iter()
            .map(|l| console::strip_ansi_codes(l).to_string())
            .collect();
        assert!(lines[1].ends_with("₹1,50,000"));
        assert!(lines[2].contains("gaming (9/10), streaming (7/10)"));
        assert!(lines[3].contains("AMD CPU, NVIDIA GPU, -"));
        assert!(lines[4].contains("SSD 2TB, HDD -"));
        assert!(lines[5].contains("GPU 9"));
    }
}
