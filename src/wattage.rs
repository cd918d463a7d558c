//! Minimum PSU wattage from the selected CPU and GPU.
//!
//! Required wattage is `ceil((cpu_draw + gpu_draw) * 1.4)`. A draw that is
//! absent or unparseable counts as 0 W; the estimate records which side was
//! missing so callers can tell a real figure from a partial one.

use tracing::warn;

use crate::part::Part;

/// Headroom applied on top of the combined draw, in percent.
pub const HEADROOM_PERCENT: u32 = 40;

/// Result of the wattage derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WattageEstimate {
    /// Minimum PSU rating to request
    pub required: u32,
    /// Parsed CPU draw, `None` when unavailable
    pub cpu_draw: Option<u32>,
    /// Parsed GPU draw, `None` when unavailable
    pub gpu_draw: Option<u32>,
}

impl WattageEstimate {
    /// Derive the estimate from the selected CPU and GPU.
    pub fn from_parts(cpu: &Part, gpu: &Part) -> Self {
        let estimate = Self::from_draws(cpu.power_draw(), gpu.power_draw());
        if !estimate.is_complete() {
            warn!(
                cpu = %cpu.name,
                gpu = %gpu.name,
                required = estimate.required,
                "power draw missing; treating it as 0W"
            );
        }
        estimate
    }

    pub fn from_draws(cpu_draw: Option<u32>, gpu_draw: Option<u32>) -> Self {
        Self {
            required: required_wattage(cpu_draw.unwrap_or(0), gpu_draw.unwrap_or(0)),
            cpu_draw,
            gpu_draw,
        }
    }

    /// Both draws were known.
    pub fn is_complete(&self) -> bool {
        self.cpu_draw.is_some() && self.gpu_draw.is_some()
    }
}

/// `ceil((cpu + gpu) * 1.4)` in integer arithmetic.
pub fn required_wattage(cpu_draw: u32, gpu_draw: u32) -> u32 {
    let total = u64::from(cpu_draw) + u64::from(gpu_draw);
    let scaled = total * u64::from(100 + HEADROOM_PERCENT);
    scaled.div_ceil(100).min(u64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_build() {
        assert_eq!(required_wattage(125, 220), 484);
    }

    #[test]
    fn test_rounds_up() {
        // 101 * 1.4 = 141.4
        assert_eq!(required_wattage(101, 0), 142);
        // 100 * 1.4 = 140 exactly
        assert_eq!(required_wattage(50, 50), 140);
        assert_eq!(required_wattage(0, 0), 0);
    }

    #[test]
    fn test_from_parts_parses_free_text() {
        let cpu = Part::new(1, "Core i5", None).with_tdp("125W");
        let gpu = Part::new(2, "RTX 3060 Ti", None).with_tdp("220 W");
        let estimate = WattageEstimate::from_parts(&cpu, &gpu);
        assert_eq!(estimate.required, 484);
        assert!(estimate.is_complete());
    }

    #[test]
    fn test_missing_draw_counts_as_zero() {
        let cpu = Part::new(1, "Core i5", None).with_tdp("125W");
        let gpu = Part::new(2, "Mystery GPU", None);
        let estimate = WattageEstimate::from_parts(&cpu, &gpu);
        assert_eq!(estimate.required, 175);
        assert_eq!(estimate.gpu_draw, None);
        assert!(!estimate.is_complete());
    }

    #[test]
    fn test_unparseable_draw_counts_as_zero() {
        let cpu = Part::new(1, "Core i5", None).with_tdp("n/a");
        let gpu = Part::new(2, "RTX", None).with_tdp("200W");
        let estimate = WattageEstimate::from_parts(&cpu, &gpu);
        assert_eq!(estimate.required, 280);
        assert_eq!(estimate.cpu_draw, None);
    }
}
