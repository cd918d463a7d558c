//! Build stages and their fixed order.
//!
//! This module provides:
//! - `Stage`, one variant per component category
//! - The canonical build order (`Stage::ORDER`)
//! - The per-stage tables: wire key, display label, and which earlier
//!   selections a stage's compatibility query needs
//!
//! Later stages may depend on earlier ones, never the reverse. Every table
//! is an exhaustive `match`, so adding a stage fails to compile until each
//! table covers it.

use serde::{Deserialize, Serialize};

/// A component category in the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Cpu,
    Motherboard,
    CpuCooler,
    Gpu,
    Case,
    Psu,
    Ram,
    Storage,
}

impl Stage {
    /// The canonical build order.
    pub const ORDER: [Stage; 8] = [
        Stage::Cpu,
        Stage::Motherboard,
        Stage::CpuCooler,
        Stage::Gpu,
        Stage::Case,
        Stage::Psu,
        Stage::Ram,
        Stage::Storage,
    ];

    /// Returns all stages in build order.
    pub fn all() -> &'static [Stage] {
        &Self::ORDER
    }

    /// 0-based position of this stage in the canonical order.
    #[inline]
    pub fn order_index(self) -> usize {
        match self {
            Stage::Cpu => 0,
            Stage::Motherboard => 1,
            Stage::CpuCooler => 2,
            Stage::Gpu => 3,
            Stage::Case => 4,
            Stage::Psu => 5,
            Stage::Ram => 6,
            Stage::Storage => 7,
        }
    }

    /// Path segment used by the compatibility service (`/api/parts/{key}`).
    pub fn key(self) -> &'static str {
        match self {
            Stage::Cpu => "cpu",
            Stage::Motherboard => "motherboard",
            Stage::CpuCooler => "cpuCooler",
            Stage::Gpu => "gpu",
            Stage::Case => "case",
            Stage::Psu => "psu",
            Stage::Ram => "ram",
            Stage::Storage => "storage",
        }
    }

    /// Human-readable label for tabs and summaries.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Cpu => "CPU",
            Stage::Motherboard => "Motherboard",
            Stage::CpuCooler => "CPU Cooler",
            Stage::Gpu => "GPU",
            Stage::Case => "Case",
            Stage::Psu => "PSU",
            Stage::Ram => "RAM",
            Stage::Storage => "Storage",
        }
    }

    /// Earlier stages whose selections this stage's query is scoped by,
    /// in the order their parameters are sent.
    pub fn requires(self) -> &'static [Stage] {
        match self {
            Stage::Cpu => &[],
            Stage::Motherboard => &[Stage::Cpu],
            Stage::CpuCooler => &[Stage::Cpu],
            Stage::Gpu => &[Stage::Motherboard],
            Stage::Case => &[Stage::Gpu, Stage::Motherboard],
            Stage::Psu => &[Stage::Case, Stage::Cpu, Stage::Gpu],
            Stage::Ram => &[Stage::Motherboard, Stage::Cpu],
            Stage::Storage => &[Stage::Motherboard],
        }
    }

    /// Query parameter carrying this stage's selected id when a later stage
    /// depends on it. Stages nothing depends on have none.
    pub fn id_param(self) -> Option<&'static str> {
        match self {
            Stage::Cpu => Some("cpu_id"),
            Stage::Motherboard => Some("mobo_id"),
            Stage::Gpu => Some("gpu_id"),
            Stage::Case => Some("case_id"),
            Stage::CpuCooler | Stage::Psu | Stage::Ram | Stage::Storage => None,
        }
    }

    /// Whether the PSU-style minimum wattage filter is sent with this stage.
    pub fn needs_wattage(self) -> bool {
        matches!(self, Stage::Psu)
    }

    /// Exact inverse of [`Stage::key`].
    pub fn from_key(key: &str) -> Option<Stage> {
        Self::ORDER.iter().copied().find(|s| s.key() == key)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_index_matches_order() {
        for (i, stage) in Stage::ORDER.iter().enumerate() {
            assert_eq!(stage.order_index(), i);
        }
    }

    #[test]
    fn test_requirements_only_point_backwards() {
        for stage in Stage::all() {
            for dep in stage.requires() {
                assert!(
                    dep.order_index() < stage.order_index(),
                    "{} depends on later stage {}",
                    stage,
                    dep
                );
                assert!(dep.id_param().is_some(), "{} has no id parameter", dep);
            }
        }
    }

    #[test]
    fn test_dependency_table() {
        assert!(Stage::Cpu.requires().is_empty());
        assert_eq!(Stage::Motherboard.requires(), &[Stage::Cpu]);
        assert_eq!(Stage::CpuCooler.requires(), &[Stage::Cpu]);
        assert_eq!(Stage::Gpu.requires(), &[Stage::Motherboard]);
        assert_eq!(Stage::Case.requires(), &[Stage::Gpu, Stage::Motherboard]);
        assert_eq!(
            Stage::Psu.requires(),
            &[Stage::Case, Stage::Cpu, Stage::Gpu]
        );
        assert_eq!(Stage::Ram.requires(), &[Stage::Motherboard, Stage::Cpu]);
        assert_eq!(Stage::Storage.requires(), &[Stage::Motherboard]);
        assert!(Stage::Psu.needs_wattage());
        assert!(!Stage::Case.needs_wattage());
    }

    #[test]
    fn test_keys_match_serde_names() {
        for stage in Stage::all() {
            let json = serde_json::to_string(stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.key()));
        }
    }

    #[test]
    fn test_from_key_is_exact() {
        assert_eq!(Stage::from_key("cpuCooler"), Some(Stage::CpuCooler));
        assert_eq!(Stage::from_key("cpucooler"), None);
        assert_eq!(Stage::from_key("CPU"), None);
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Stage::CpuCooler.to_string(), "CPU Cooler");
        assert_eq!(Stage::Motherboard.to_string(), "Motherboard");
    }
}
