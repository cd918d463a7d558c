//! Text rendering for the interactive build: stage tabs, candidate rows and
//! the final summary. Everything here returns strings so it can be tested
//! without a terminal.

use console::style;

use crate::configurator::SelectionState;
use crate::part::Part;
use crate::pricing::{PriceSummary, Pricing};
use crate::stage::Stage;
use crate::ui::icons::{BOLT, CART, CHECK};

/// Note printed under a total that is only a lower bound.
pub const MISSING_PRICE_NOTE: &str = "(Some parts missing price data)";

/// One line of stage tabs. Completed stages carry a check mark, the current
/// stage is highlighted and later stages are dimmed.
pub fn render_tabs(stages: &[Stage], current: usize) -> String {
    stages
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            if i < current {
                format!("{}{}", CHECK, style(stage.label()).green())
            } else if i == current {
                style(format!("[{}]", stage.label())).cyan().bold().to_string()
            } else {
                style(stage.label()).dim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Picker row for a candidate: name, converted price, and power draw when
/// the part reports one.
pub fn candidate_label(part: &Part, pricing: &Pricing) -> String {
    let mut label = format!("{:<44} {}", part.name, pricing.part_label(part));
    if let Some(draw) = part.power_draw() {
        label.push_str(&format!("  {}{}W", BOLT, draw));
    }
    label
}

/// Lines of the build summary: one per selection, then the total.
pub fn summary_lines(selections: &SelectionState, pricing: &Pricing, summary: &PriceSummary) -> Vec<String> {
    let mut lines = vec![format!("{}{}", CART, style("Your build").bold())];
    for (stage, part) in selections.iter() {
        lines.push(format!(
            "  {:<12} {:<44} {}",
            format!("{}:", stage.label()),
            part.name,
            pricing.part_label(part)
        ));
    }
    lines.push(format!(
        "  {:<12} {}",
        "Total:",
        style(pricing.total_label(summary)).bold()
    ));
    if summary.has_missing_price() {
        lines.push(format!("  {}", style(MISSING_PRICE_NOTE).yellow()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::FieldValue;

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).to_string()
    }

    #[test]
    fn test_tabs_mark_progress() {
        let tabs = plain(&render_tabs(&Stage::ORDER, 2));
        assert!(tabs.contains("CPU"));
        assert!(tabs.contains("[CPU Cooler]"));
        assert!(tabs.contains("Storage"));
        assert!(!tabs.contains("[CPU]"));
        let cpu = tabs.find("CPU").unwrap();
        let current = tabs.find("[CPU Cooler]").unwrap();
        assert!(cpu < current);
    }

    #[test]
    fn test_candidate_label_shows_price_and_draw() {
        let pricing = Pricing::default();
        let cpu = Part::new(1, "Intel Core i5-12600K", Some(FieldValue::Number(299.99))).with_tdp("125 W");
        let label = plain(&candidate_label(&cpu, &pricing));
        assert!(label.starts_with("Intel Core i5-12600K"));
        assert!(label.contains("₹24,899.17"));
        assert!(label.contains("125W"));

        let unpriced = Part::new(2, "Mystery board", None);
        assert!(candidate_label(&unpriced, &pricing).contains("Price unavailable"));
    }

    #[test]
    fn test_summary_notes_missing_prices() {
        let pricing = Pricing::default();
        let selections = SelectionState::from_entries(vec![
            (Stage::Cpu, Part::new(1, "CPU A", Some(FieldValue::Number(10.0)))),
            (Stage::Motherboard, Part::new(2, "Board B", Some(FieldValue::from("call us")))),
        ]);
        let summary = pricing.summarize(selections.parts());
        let lines: Vec<String> = summary_lines(&selections, &pricing, &summary)
            .iter()
            .map(|l| plain(l))
            .collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("CPU:") && lines[1].contains("₹830"));
        assert!(lines[2].contains("Price unavailable"));
        assert!(lines[3].contains("₹830 + extra"));
        assert_eq!(lines[4].trim(), MISSING_PRICE_NOTE);
    }

    #[test]
    fn test_summary_without_missing_prices_has_no_note() {
        let pricing = Pricing::default();
        let selections =
            SelectionState::from_entries(vec![(Stage::Cpu, Part::new(1, "CPU A", Some(FieldValue::Number(1.5))))]);
        let summary = pricing.summarize(selections.parts());
        let lines = summary_lines(&selections, &pricing, &summary);
        assert_eq!(lines.len(), 3);
        assert!(plain(&lines[2]).contains("₹124.5"));
    }
}
