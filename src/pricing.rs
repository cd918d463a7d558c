//! Build total with missing-price tolerance.
//!
//! Every selected part's price is normalized (see [`Part::normalized_price`]).
//! Parts without a usable price add nothing to the sum but flag the summary,
//! and the display then marks the total as a lower bound.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::part::Part;

/// Marker appended to a total that is only a lower bound.
pub const LOWER_BOUND_SUFFIX: &str = " + extra";

/// Shown in place of a price that could not be normalized.
pub const PRICE_UNAVAILABLE: &str = "Price unavailable";

/// Currency conversion applied to every displayed amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Multiplier from catalog currency to display currency
    #[serde(default = "default_conversion_rate")]
    pub conversion_rate: f64,
    /// Symbol prefixed to displayed amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_conversion_rate() -> f64 {
    83.0
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            conversion_rate: default_conversion_rate(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Pricing {
    pub fn new(conversion_rate: f64, currency_symbol: &str) -> Self {
        Self {
            conversion_rate,
            currency_symbol: currency_symbol.to_string(),
        }
    }

    /// Sum the given parts' prices.
    pub fn summarize<'a>(&self, parts: impl IntoIterator<Item = &'a Part>) -> PriceSummary {
        let mut subtotal = 0.0;
        let mut unpriced = Vec::new();

        for part in parts {
            match part.normalized_price() {
                Some(price) => subtotal += price,
                None => {
                    debug!(part = %part.name, raw = ?part.price, "price unparseable");
                    unpriced.push(part.name.clone());
                }
            }
        }

        PriceSummary {
            subtotal,
            converted: subtotal * self.conversion_rate,
            unpriced,
        }
    }

    /// `"₹24,899.17"` for a catalog amount of 299.99 at the default rate.
    pub fn format_amount(&self, amount: f64) -> String {
        format!(
            "{}{}",
            self.currency_symbol,
            format_grouped(amount * self.conversion_rate)
        )
    }

    /// Converted price of a single part, or [`PRICE_UNAVAILABLE`].
    pub fn part_label(&self, part: &Part) -> String {
        match part.normalized_price() {
            Some(price) => self.format_amount(price),
            None => PRICE_UNAVAILABLE.to_string(),
        }
    }

    /// Total with currency symbol, e.g. `"₹41,498.34 + extra"`.
    pub fn total_label(&self, summary: &PriceSummary) -> String {
        format!("{}{}", self.currency_symbol, summary.display_total())
    }
}

/// Aggregate price of a set of parts.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    /// Sum of normalized prices in catalog currency
    pub subtotal: f64,
    /// `subtotal` multiplied by the conversion rate
    pub converted: f64,
    /// Names of parts whose price could not be normalized
    pub unpriced: Vec<String>,
}

impl PriceSummary {
    /// At least one part contributed 0 because its price was unusable.
    pub fn has_missing_price(&self) -> bool {
        !self.unpriced.is_empty()
    }

    /// Grouped converted total, suffixed with [`LOWER_BOUND_SUFFIX`] when
    /// any price is missing.
    pub fn display_total(&self) -> String {
        let formatted = format_grouped(self.converted);
        if self.has_missing_price() {
            format!("{}{}", formatted, LOWER_BOUND_SUFFIX)
        } else {
            formatted
        }
    }
}

/// Format with Indian digit grouping (`12,34,567.891`), at most three
/// fraction digits, trailing zeros dropped.
pub fn format_grouped(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }

    let scaled = (amount.abs() * 1000.0).round() as u128;
    let whole = (scaled / 1000).to_string();
    let fraction = format!("{:03}", scaled % 1000);
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::new();
    if amount < 0.0 && scaled > 0 {
        out.push('-');
    }
    out.push_str(&group_indian(&whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Last three digits form one group, the rest are grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
