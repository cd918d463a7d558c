//! Stage order reference — `buildmate stages`.

use console::style;

use buildmate::configurator::REQUIRED_WATTAGE_PARAM;
use buildmate::stage::Stage;

pub fn cmd_stages() {
    println!();
    println!("{}", style("Build order").bold());
    println!();
    for line in stage_table() {
        println!("{}", line);
    }
    println!();
    println!(
        "{}",
        style("Each stage's options depend on the parts chosen before it.").dim()
    );
    println!();
}

/// One line per stage: position, label, wire key and query parameters.
fn stage_table() -> Vec<String> {
    Stage::all()
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let mut params: Vec<String> = stage
                .requires()
                .iter()
                .filter_map(|dep| dep.id_param().map(|p| format!("{} ({})", p, dep.label())))
                .collect();
            if stage.needs_wattage() {
                params.push(REQUIRED_WATTAGE_PARAM.to_string());
            }
            let needs = if params.is_empty() {
                "-".to_string()
            } else {
                params.join(", ")
            };
            format!(
                "  {}. {:<12} /api/parts/{:<12} needs: {}",
                i + 1,
                stage.label(),
                stage.key(),
                needs
            )
        })
        .collect()
}
