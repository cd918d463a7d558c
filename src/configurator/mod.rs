//! The sequential configurator.
//!
//! A cursor walks the stage list. `select` records a part for the current
//! stage and advances; `rewind_to` drops every selection from a completed
//! stage onwards and moves the cursor back to it. The selections are always
//! exactly the stages before the cursor.
//!
//! Entering a stage clears the search filter and the old candidates, and
//! queues a [`FetchRequest`] for the new stage. The owner runs the request
//! and hands the result back through [`Configurator::apply_fetch`] with the
//! request's ticket; results carrying any other ticket are stale and dropped.

pub mod query;
pub mod selection;

pub use query::{FetchRequest, REQUIRED_WATTAGE_PARAM, StageQuery};
pub use selection::SelectionState;

use tracing::{debug, info, warn};

use crate::errors::{ConfiguratorError, FetchError};
use crate::part::Part;
use crate::pricing::{PriceSummary, Pricing};
use crate::stage::Stage;

/// Where the cursor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Choosing a part for `stages[i]`
    Selecting(usize),
    /// Every stage has a selection
    Complete,
}

/// Candidate list for the current stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidates {
    /// Build complete; nothing to fetch
    Idle,
    /// Waiting for the response to `ticket`
    Loading { ticket: u64 },
    /// Fetched candidates, in service order
    Ready(Vec<Part>),
    /// The fetch failed or could not be issued
    Failed { message: String },
}

pub struct Configurator {
    stages: Vec<Stage>,
    selections: SelectionState,
    candidates: Candidates,
    filter: String,
    last_ticket: u64,
    pending: Option<FetchRequest>,
}

impl Configurator {
    /// Configurator over the full build order, positioned at the first stage.
    pub fn new() -> Self {
        Self::start(Stage::ORDER.to_vec())
    }

    /// Configurator over a subset of stages.
    ///
    /// The list must be non-empty and follow the canonical order without
    /// repeats. A stage whose dependency is left out of the list will report
    /// `MissingDependency` when entered.
    pub fn with_stages(stages: Vec<Stage>) -> Result<Self, ConfiguratorError> {
        if stages.is_empty() {
            return Err(ConfiguratorError::NoStages);
        }
        for pair in stages.windows(2) {
            if pair[1].order_index() <= pair[0].order_index() {
                return Err(ConfiguratorError::InvalidStageOrder(pair[1]));
            }
        }
        Ok(Self::start(stages))
    }

    fn start(stages: Vec<Stage>) -> Self {
        let mut configurator = Self {
            stages,
            selections: SelectionState::new(),
            candidates: Candidates::Idle,
            filter: String::new(),
            last_ticket: 0,
            pending: None,
        };
        configurator.enter_stage();
        configurator
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Index of the stage being chosen; equals `stage_count()` when complete.
    pub fn current_index(&self) -> usize {
        self.selections.len()
    }

    pub fn cursor(&self) -> Cursor {
        let index = self.current_index();
        if index < self.stages.len() {
            Cursor::Selecting(index)
        } else {
            Cursor::Complete
        }
    }

    pub fn current_stage(&self) -> Option<Stage> {
        self.stages.get(self.current_index()).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor() == Cursor::Complete
    }

    pub fn selections(&self) -> &SelectionState {
        &self.selections
    }

    pub fn selection(&self, stage: Stage) -> Option<&Part> {
        self.selections.get(stage)
    }

    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.candidates, Candidates::Loading { .. })
    }

    /// `(stage_index, message)` when the current stage's fetch failed.
    pub fn stage_error(&self) -> Option<(usize, &str)> {
        match &self.candidates {
            Candidates::Failed { message } => Some((self.current_index(), message.as_str())),
            _ => None,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.to_string();
    }

    /// Candidates whose name contains the filter text, ignoring case.
    pub fn filtered_candidates(&self) -> Vec<&Part> {
        match &self.candidates {
            Candidates::Ready(parts) => parts.iter().filter(|p| p.matches(&self.filter)).collect(),
            _ => Vec::new(),
        }
    }

    /// The fetch queued by the last stage entry, if not yet taken.
    pub fn pending_fetch(&self) -> Option<&FetchRequest> {
        self.pending.as_ref()
    }

    pub fn take_pending_fetch(&mut self) -> Option<FetchRequest> {
        self.pending.take()
    }

    /// Record `part` for the current stage and advance.
    ///
    /// Always advances; selecting twice in a row fills two stages.
    pub fn select(&mut self, part: Part) -> Result<Cursor, ConfiguratorError> {
        let Some(stage) = self.current_stage() else {
            return Err(ConfiguratorError::BuildComplete);
        };

        info!(stage = %stage, id = part.id, name = %part.name, "selected part");
        self.selections.push(stage, part);
        self.enter_stage();
        Ok(self.cursor())
    }

    /// Select the fetched candidate with the given id.
    pub fn select_candidate(&mut self, id: i64) -> Result<Cursor, ConfiguratorError> {
        let Some(stage) = self.current_stage() else {
            return Err(ConfiguratorError::BuildComplete);
        };
        let part = match &self.candidates {
            Candidates::Ready(parts) => parts.iter().find(|p| p.id == id).cloned(),
            _ => None,
        }
        .ok_or(ConfiguratorError::UnknownCandidate { stage, id })?;

        self.select(part)
    }

    /// Drop selections for `stages[target..]` and return to that stage.
    ///
    /// Only completed stages can be revisited; anything else is rejected and
    /// leaves the state untouched.
    pub fn rewind_to(&mut self, target: usize) -> Result<(), ConfiguratorError> {
        let current = self.current_index();
        if target >= current {
            return Err(ConfiguratorError::InvalidRewind { target, current });
        }

        info!(from = current, to = target, "rewinding build");
        self.selections.truncate(target);
        self.enter_stage();
        Ok(())
    }

    /// Queue a fresh fetch for the current stage, superseding any in flight.
    pub fn retry(&mut self) -> Result<(), ConfiguratorError> {
        if self.is_complete() {
            return Err(ConfiguratorError::BuildComplete);
        }
        self.enter_stage();
        Ok(())
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns `false` and changes nothing when `ticket` is not the one the
    /// configurator is waiting for.
    pub fn apply_fetch(&mut self, ticket: u64, result: Result<Vec<Part>, FetchError>) -> bool {
        match self.candidates {
            Candidates::Loading { ticket: waiting } if waiting == ticket => {}
            _ => {
                debug!(ticket, "discarding stale fetch result");
                return false;
            }
        }

        self.candidates = match result {
            Ok(parts) => {
                debug!(count = parts.len(), "candidates received");
                Candidates::Ready(parts)
            }
            Err(err) => {
                warn!(error = %err, "candidate fetch failed");
                Candidates::Failed {
                    message: err.to_string(),
                }
            }
        };
        true
    }

    /// Price of everything selected so far.
    pub fn price_summary(&self, pricing: &Pricing) -> PriceSummary {
        pricing.summarize(self.selections.parts())
    }

    fn enter_stage(&mut self) {
        self.filter.clear();
        self.last_ticket += 1;
        self.pending = None;

        let Some(stage) = self.current_stage() else {
            info!("build complete");
            self.candidates = Candidates::Idle;
            return;
        };

        match StageQuery::build(stage, &self.selections) {
            Ok(query) => {
                debug!(stage = %stage, ticket = self.last_ticket, params = ?query.params, "queueing fetch");
                self.candidates = Candidates::Loading {
                    ticket: self.last_ticket,
                };
                self.pending = Some(FetchRequest {
                    ticket: self.last_ticket,
                    stage_index: self.current_index(),
                    query,
                });
            }
            Err(err) => {
                warn!(error = %err, "cannot query stage");
                self.candidates = Candidates::Failed {
                    message: err.to_string(),
                };
            }
        }
    }
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::FieldValue;

    fn part(id: i64, name: &str, price: f64) -> Part {
        Part::new(id, name, Some(FieldValue::Number(price)))
    }

    /// Answer the pending fetch with `parts`.
    fn answer(cfg: &mut Configurator, parts: Vec<Part>) {
        let request = cfg.take_pending_fetch().expect("fetch queued");
        assert!(cfg.apply_fetch(request.ticket, Ok(parts)));
    }

    fn assert_prefix_invariant(cfg: &Configurator) {
        let expected: Vec<Stage> = cfg.stages()[..cfg.current_index()].to_vec();
        assert_eq!(cfg.selections().stages(), expected);
    }

    fn fill_through(cfg: &mut Configurator, count: usize) {
        for _ in 0..count {
            let stage = cfg.current_stage().unwrap();
            let mut p = part(stage.order_index() as i64 + 1, stage.label(), 10.0);
            if stage == Stage::Cpu {
                p = p.with_tdp("125W");
            }
            if stage == Stage::Gpu {
                p = p.with_tdp("220W");
            }
            cfg.select(p).unwrap();
            assert_prefix_invariant(cfg);
        }
    }

    #[test]
    fn test_starts_at_first_stage_with_fetch_queued() {
        let cfg = Configurator::new();
        assert_eq!(cfg.cursor(), Cursor::Selecting(0));
        assert!(cfg.selections().is_empty());
        assert!(cfg.is_loading());
        let request = cfg.pending_fetch().unwrap();
        assert_eq!(request.query.stage, Stage::Cpu);
        assert_eq!(request.stage_index, 0);
    }

    #[test]
    fn test_reduced_scenario() {
        let mut cfg = Configurator::with_stages(vec![Stage::Cpu, Stage::Motherboard]).unwrap();
        answer(&mut cfg, vec![part(1, "Core i5", 299.99)]);

        assert_eq!(cfg.select_candidate(1).unwrap(), Cursor::Selecting(1));
        let request = cfg.pending_fetch().unwrap();
        assert_eq!(request.query.stage, Stage::Motherboard);
        assert_eq!(request.query.param("cpu_id"), Some("1"));

        answer(&mut cfg, vec![part(5, "B660", 189.99)]);
        assert_eq!(cfg.select_candidate(5).unwrap(), Cursor::Complete);
        assert!(cfg.pending_fetch().is_none());
        assert_eq!(cfg.candidates(), &Candidates::Idle);

        cfg.rewind_to(0).unwrap();
        assert!(cfg.selections().is_empty());
        assert_eq!(cfg.cursor(), Cursor::Selecting(0));
        assert_eq!(cfg.pending_fetch().unwrap().query.stage, Stage::Cpu);
    }

    #[test]
    fn test_prefix_invariant_through_full_build() {
        let mut cfg = Configurator::new();
        fill_through(&mut cfg, 8);
        assert!(cfg.is_complete());
        assert_eq!(cfg.current_index(), 8);
        assert_eq!(cfg.select(part(99, "extra", 1.0)), Err(ConfiguratorError::BuildComplete));
    }

    #[test]
    fn test_psu_stage_fetch_carries_wattage() {
        let mut cfg = Configurator::new();
        fill_through(&mut cfg, 5);
        let request = cfg.pending_fetch().unwrap();
        assert_eq!(request.query.stage, Stage::Psu);
        assert_eq!(request.query.param(REQUIRED_WATTAGE_PARAM), Some("484"));
    }

    #[test]
    fn test_rewind_truncates_prefix() {
        let mut cfg = Configurator::new();
        fill_through(&mut cfg, 5);

        cfg.rewind_to(2).unwrap();
        assert_eq!(cfg.cursor(), Cursor::Selecting(2));
        assert_prefix_invariant(&cfg);
        assert!(cfg.selection(Stage::Motherboard).is_some());
        assert!(cfg.selection(Stage::CpuCooler).is_none());
        assert!(cfg.selection(Stage::Case).is_none());
    }

    #[test]
    fn test_rewind_then_reselect_matches_fresh_path() {
        let mut rewound = Configurator::new();
        fill_through(&mut rewound, 6);
        rewound.rewind_to(2).unwrap();
        fill_through(&mut rewound, 3);

        let mut fresh = Configurator::new();
        fill_through(&mut fresh, 5);

        assert_eq!(rewound.selections(), fresh.selections());
        assert_eq!(rewound.cursor(), fresh.cursor());
    }

    #[test]
    fn test_repeated_rewind_is_rejected_without_change() {
        let mut cfg = Configurator::new();
        fill_through(&mut cfg, 4);
        cfg.rewind_to(1).unwrap();
        let before = cfg.selections().clone();

        let err = cfg.rewind_to(1).unwrap_err();
        assert_eq!(err, ConfiguratorError::InvalidRewind { target: 1, current: 1 });
        assert_eq!(cfg.selections(), &before);
        assert_eq!(cfg.cursor(), Cursor::Selecting(1));
    }

    #[test]
    fn test_rewind_forward_is_rejected() {
        let mut cfg = Configurator::new();
        fill_through(&mut cfg, 2);
        assert!(cfg.rewind_to(2).is_err());
        assert!(cfg.rewind_to(5).is_err());
        assert_eq!(cfg.current_index(), 2);
    }

    #[test]
    fn test_rewind_from_complete() {
        let mut cfg = Configurator::new();
        fill_through(&mut cfg, 8);
        cfg.rewind_to(7).unwrap();
        assert_eq!(cfg.cursor(), Cursor::Selecting(7));
        assert_eq!(cfg.selections().len(), 7);
        assert!(cfg.rewind_to(8).is_err());
    }

    #[test]
    fn test_stage_entry_resets_filter_and_candidates() {
        let mut cfg = Configurator::new();
        answer(
            &mut cfg,
            vec![part(1, "Intel Core i5", 1.0), part(2, "AMD Ryzen 5", 1.0)],
        );
        cfg.set_filter("ryzen");
        assert_eq!(cfg.filtered_candidates().len(), 1);

        cfg.select_candidate(2).unwrap();
        assert_eq!(cfg.filter(), "");
        assert!(cfg.is_loading());
        assert!(cfg.filtered_candidates().is_empty());
    }

    #[test]
    fn test_filter_is_case_insensitive_and_local() {
        let mut cfg = Configurator::new();
        answer(
            &mut cfg,
            vec![part(1, "Intel Core i5", 1.0), part(2, "AMD Ryzen 5", 1.0)],
        );
        cfg.set_filter("INTEL");
        let names: Vec<&str> = cfg.filtered_candidates().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Intel Core i5"]);
        assert!(cfg.selections().is_empty());
        cfg.set_filter("");
        assert_eq!(cfg.filtered_candidates().len(), 2);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut cfg = Configurator::new();
        answer(&mut cfg, vec![part(1, "cpu", 1.0)]);
        cfg.select_candidate(1).unwrap();

        let motherboard_request = cfg.take_pending_fetch().unwrap();
        cfg.rewind_to(0).unwrap();
        let cpu_request = cfg.take_pending_fetch().unwrap();

        assert!(!cfg.apply_fetch(motherboard_request.ticket, Ok(vec![part(5, "board", 1.0)])));
        assert!(cfg.is_loading());

        assert!(cfg.apply_fetch(cpu_request.ticket, Ok(vec![part(1, "cpu", 1.0)])));
        assert_eq!(cfg.filtered_candidates()[0].name, "cpu");
    }

    #[test]
    fn test_fetch_failure_keeps_selections() {
        let mut cfg = Configurator::new();
        fill_through(&mut cfg, 2);
        let request = cfg.take_pending_fetch().unwrap();

        let applied = cfg.apply_fetch(
            request.ticket,
            Err(FetchError::Status {
                status: 500,
                message: "boom".into(),
            }),
        );
        assert!(applied);
        let (index, message) = cfg.stage_error().unwrap();
        assert_eq!(index, 2);
        assert!(message.contains("boom"));
        assert_eq!(cfg.selections().len(), 2);
        assert!(cfg.filtered_candidates().is_empty());

        cfg.retry().unwrap();
        assert!(cfg.is_loading());
        assert!(cfg.stage_error().is_none());
        assert_eq!(cfg.pending_fetch().unwrap().stage_index, 2);
    }

    #[test]
    fn test_retry_supersedes_in_flight_fetch() {
        let mut cfg = Configurator::new();
        let first = cfg.take_pending_fetch().unwrap();
        cfg.retry().unwrap();
        let second = cfg.take_pending_fetch().unwrap();
        assert_ne!(first.ticket, second.ticket);
        assert!(!cfg.apply_fetch(first.ticket, Ok(vec![])));
        assert!(cfg.apply_fetch(second.ticket, Ok(vec![])));
    }

    #[test]
    fn test_missing_dependency_surfaces_as_stage_error() {
        let mut cfg = Configurator::with_stages(vec![Stage::Cpu, Stage::Gpu]).unwrap();
        cfg.select(part(1, "cpu", 1.0)).unwrap();
        assert!(cfg.pending_fetch().is_none());
        let (index, message) = cfg.stage_error().unwrap();
        assert_eq!(index, 1);
        assert!(message.contains("Motherboard"));
    }

    #[test]
    fn test_select_unknown_candidate() {
        let mut cfg = Configurator::new();
        answer(&mut cfg, vec![part(1, "cpu", 1.0)]);
        assert_eq!(
            cfg.select_candidate(42),
            Err(ConfiguratorError::UnknownCandidate {
                stage: Stage::Cpu,
                id: 42
            })
        );
        assert_eq!(cfg.current_index(), 0);
    }

    #[test]
    fn test_with_stages_validates_order() {
        assert_eq!(
            Configurator::with_stages(vec![]).err(),
            Some(ConfiguratorError::NoStages)
        );
        assert_eq!(
            Configurator::with_stages(vec![Stage::Gpu, Stage::Cpu]).err(),
            Some(ConfiguratorError::InvalidStageOrder(Stage::Cpu))
        );
        assert_eq!(
            Configurator::with_stages(vec![Stage::Cpu, Stage::Cpu]).err(),
            Some(ConfiguratorError::InvalidStageOrder(Stage::Cpu))
        );
    }

    #[test]
    fn test_price_summary_tracks_selection() {
        let pricing = Pricing::default();
        let mut cfg = Configurator::new();
        cfg.select(part(1, "cpu", 100.0)).unwrap();
        cfg.select(Part::new(2, "board", Some(FieldValue::from("$212.10"))))
            .unwrap();
        let summary = cfg.price_summary(&pricing);
        assert!((summary.subtotal - 312.10).abs() < 1e-9);
        assert!(!summary.has_missing_price());

        cfg.select(Part::new(3, "cooler", None)).unwrap();
        let summary = cfg.price_summary(&pricing);
        assert!(summary.has_missing_price());
        assert!(summary.display_total().ends_with("+ extra"));

        cfg.rewind_to(2).unwrap();
        assert!(!cfg.price_summary(&pricing).has_missing_price());
    }
}
