//! Part records as returned by the compatibility service.
//!
//! Price and power-draw fields arrive loosely typed: a bare number, a
//! currency-formatted string such as `"$212.10"`, free text such as `"125W"`,
//! or nothing at all. This module keeps the raw value and offers normalized
//! accessors that report "missing" explicitly instead of coercing to zero.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?|\.\d+").unwrap());

// Anchored: tried at the start of a plain match.
static GROUPED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:,\d{3})+(?:\.\d+)?").unwrap());

static INTEGER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// A loosely typed scalar field: JSON number or JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric amount: the number itself, or the first numeric substring of
    /// the text. Non-finite numbers and digit-free text yield `None`.
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => first_number(s),
        }
    }

    /// First whole number: the truncated number, or the first digit run of
    /// the text.
    pub fn as_integer(&self) -> Option<u32> {
        match self {
            FieldValue::Number(n) if n.is_finite() && *n >= 0.0 => Some(n.trunc() as u32),
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => first_integer(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// A purchasable component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Unique within one stage's candidate set
    pub id: i64,
    /// Display name
    pub name: String,
    /// Raw price as delivered; see [`Part::normalized_price`]
    #[serde(default)]
    pub price: Option<FieldValue>,
    /// Rated power draw for CPUs and GPUs (e.g. `"125W"`)
    #[serde(default, alias = "power_draw", skip_serializing_if = "Option::is_none")]
    pub tdp: Option<FieldValue>,
}

impl Part {
    pub fn new(id: i64, name: &str, price: Option<FieldValue>) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            tdp: None,
        }
    }

    pub fn with_tdp(mut self, tdp: &str) -> Self {
        self.tdp = Some(FieldValue::from(tdp));
        self
    }

    /// Price as a number, or `None` when absent or unparseable.
    pub fn normalized_price(&self) -> Option<f64> {
        self.price.as_ref().and_then(FieldValue::as_amount)
    }

    /// Power draw in watts, or `None` when absent or unparseable.
    pub fn power_draw(&self) -> Option<u32> {
        self.tdp.as_ref().and_then(FieldValue::as_integer)
    }

    /// Case-insensitive substring match against the display name.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// First numeric substring of `text`, honouring `,` thousands grouping.
///
/// Grouping only counts when the grouped run is not followed by another
/// digit; `"1,2345"` reads as `1`.
pub fn first_number(text: &str) -> Option<f64> {
    let plain = NUMBER_REGEX.find(text)?;
    let rest = &text[plain.start()..];
    if let Some(grouped) = GROUPED_REGEX.find(rest)
        && !rest[grouped.end()..].starts_with(|c: char| c.is_ascii_digit())
    {
        return grouped.as_str().replace(',', "").parse().ok();
    }
    plain.as_str().parse().ok()
}

/// First run of digits in `text`.
pub fn first_integer(text: &str) -> Option<u32> {
    INTEGER_REGEX.find(text)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_currency_string() {
        assert_eq!(first_number("$212.10"), Some(212.10));
        assert_eq!(first_number("212"), Some(212.0));
        assert_eq!(first_number("USD 1,299.99"), Some(1299.99));
        assert_eq!(first_number("from 89.99 to 99.99"), Some(89.99));
        assert_eq!(first_number(".99"), Some(0.99));
        assert_eq!(first_number("$0.99"), Some(0.99));
        assert_eq!(first_number("1,2345"), Some(1.0));
        assert_eq!(first_number("12,34,567"), Some(12.0));
        assert_eq!(first_number("N/A"), None);
        assert_eq!(first_number(""), None);
    }

    #[test]
    fn test_first_integer_power_draw() {
        assert_eq!(first_integer("125W"), Some(125));
        assert_eq!(first_integer("TDP: 65 W"), Some(65));
        assert_eq!(first_integer("unknown"), None);
    }

    #[test]
    fn test_part_deserializes_string_price() {
        let part: Part =
            serde_json::from_str(r#"{"id": 3, "name": "Ryzen 5 5600X", "price": "$212.10"}"#)
                .unwrap();
        assert_eq!(part.normalized_price(), Some(212.10));
    }

    #[test]
    fn test_part_deserializes_numeric_price() {
        let part: Part =
            serde_json::from_str(r#"{"id": 1, "name": "Core i5", "price": 299.99}"#).unwrap();
        assert_eq!(part.normalized_price(), Some(299.99));
    }

    #[test]
    fn test_part_missing_and_null_price() {
        let missing: Part = serde_json::from_str(r#"{"id": 1, "name": "A"}"#).unwrap();
        let null: Part = serde_json::from_str(r#"{"id": 2, "name": "B", "price": null}"#).unwrap();
        let junk: Part =
            serde_json::from_str(r#"{"id": 3, "name": "C", "price": "call us"}"#).unwrap();
        assert_eq!(missing.normalized_price(), None);
        assert_eq!(null.normalized_price(), None);
        assert_eq!(junk.normalized_price(), None);
    }

    #[test]
    fn test_part_ignores_extra_columns() {
        let part: Part = serde_json::from_str(
            r#"{"id": 9, "name": "RTX 3070", "price": "499.99", "tdp": "220W", "memory": "8GB"}"#,
        )
        .unwrap();
        assert_eq!(part.power_draw(), Some(220));
    }

    #[test]
    fn test_power_draw_alias_and_number() {
        let part: Part =
            serde_json::from_str(r#"{"id": 1, "name": "X", "power_draw": 95}"#).unwrap();
        assert_eq!(part.power_draw(), Some(95));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let part = Part::new(1, "AMD Ryzen 5 5600X", None);
        assert!(part.matches("ryzen"));
        assert!(part.matches("5600x"));
        assert!(part.matches(""));
        assert!(!part.matches("intel"));
    }
}
