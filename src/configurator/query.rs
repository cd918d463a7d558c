//! Per-stage compatibility queries.
//!
//! A query names the stage and carries the identifiers of the earlier
//! selections that stage is scoped by. The PSU stage also carries the minimum
//! wattage derived from the selected CPU and GPU.

use crate::errors::ConfiguratorError;
use crate::stage::Stage;
use crate::wattage::WattageEstimate;

use super::selection::SelectionState;

/// Query parameter for the PSU wattage filter.
pub const REQUIRED_WATTAGE_PARAM: &str = "required_wattage";

/// A ready-to-send candidate query for one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageQuery {
    pub stage: Stage,
    pub params: Vec<(&'static str, String)>,
    pub wattage: Option<WattageEstimate>,
}

impl StageQuery {
    /// Build the query for `stage` from the current selections.
    ///
    /// Fails with `MissingDependency` naming the first required stage that
    /// has no selection; no request should be made in that case.
    pub fn build(stage: Stage, selections: &SelectionState) -> Result<Self, ConfiguratorError> {
        let mut params = Vec::new();

        for &dep in stage.requires() {
            let part = selections
                .get(dep)
                .ok_or(ConfiguratorError::MissingDependency {
                    stage,
                    missing: dep,
                })?;
            if let Some(name) = dep.id_param() {
                params.push((name, part.id.to_string()));
            }
        }

        let wattage = if stage.needs_wattage() {
            match (selections.get(Stage::Cpu), selections.get(Stage::Gpu)) {
                (Some(cpu), Some(gpu)) => {
                    let estimate = WattageEstimate::from_parts(cpu, gpu);
                    params.push((REQUIRED_WATTAGE_PARAM, estimate.required.to_string()));
                    Some(estimate)
                }
                // requires() already lists both, so this arm is unreachable
                // unless the tables drift apart.
                (None, _) => {
                    return Err(ConfiguratorError::MissingDependency {
                        stage,
                        missing: Stage::Cpu,
                    });
                }
                (_, None) => {
                    return Err(ConfiguratorError::MissingDependency {
                        stage,
                        missing: Stage::Gpu,
                    });
                }
            }
        } else {
            None
        };

        Ok(Self {
            stage,
            params,
            wattage,
        })
    }

    /// Value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Service path for this stage, e.g. `/api/parts/motherboard`.
    pub fn path(&self) -> String {
        format!("/api/parts/{}", self.stage.key())
    }
}

/// A query the owner of a [`Configurator`](super::Configurator) should
/// run, tagged with the ticket its response must be applied with.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticket: u64,
    pub stage_index: usize,
    pub query: StageQuery,
}
