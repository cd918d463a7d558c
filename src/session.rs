//! Async driver pairing a [`Configurator`] with a [`CompatibilitySource`].
//!
//! Every transition that enters a stage is followed by running the queued
//! fetch and applying its result, so callers only see settled states:
//! candidates ready, or a stage error they can retry.

use tracing::debug;

use crate::client::CompatibilitySource;
use crate::configurator::{Configurator, Cursor};
use crate::errors::ConfiguratorError;
use crate::part::Part;
use crate::pricing::{PriceSummary, Pricing};
use crate::stage::Stage;

pub struct BuildSession<S> {
    configurator: Configurator,
    source: S,
}

impl<S: CompatibilitySource> BuildSession<S> {
    /// Start a full build and load the first stage's candidates.
    pub async fn start(source: S) -> Self {
        let mut session = Self {
            configurator: Configurator::new(),
            source,
        };
        session.refresh().await;
        session
    }

    /// Start a build over a subset of stages.
    pub async fn with_stages(source: S, stages: Vec<Stage>) -> Result<Self, ConfiguratorError> {
        let mut session = Self {
            configurator: Configurator::with_stages(stages)?,
            source,
        };
        session.refresh().await;
        Ok(session)
    }

    pub fn configurator(&self) -> &Configurator {
        &self.configurator
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cursor(&self) -> Cursor {
        self.configurator.cursor()
    }

    pub fn set_filter(&mut self, text: &str) {
        self.configurator.set_filter(text);
    }

    pub fn filtered_candidates(&self) -> Vec<&Part> {
        self.configurator.filtered_candidates()
    }

    pub fn price_summary(&self, pricing: &Pricing) -> PriceSummary {
        self.configurator.price_summary(pricing)
    }

    /// Run the queued fetch, if any. Returns whether a result was applied.
    pub async fn refresh(&mut self) -> bool {
        let Some(request) = self.configurator.take_pending_fetch() else {
            return false;
        };
        debug!(stage = %request.query.stage, ticket = request.ticket, "running fetch");
        let result = self.source.fetch(&request.query).await;
        self.configurator.apply_fetch(request.ticket, result)
    }

    pub async fn select(&mut self, part: Part) -> Result<Cursor, ConfiguratorError> {
        let cursor = self.configurator.select(part)?;
        self.refresh().await;
        Ok(cursor)
    }

    pub async fn select_candidate(&mut self, id: i64) -> Result<Cursor, ConfiguratorError> {
        let cursor = self.configurator.select_candidate(id)?;
        self.refresh().await;
        Ok(cursor)
    }

    pub async fn rewind_to(&mut self, target: usize) -> Result<(), ConfiguratorError> {
        self.configurator.rewind_to(target)?;
        self.refresh().await;
        Ok(())
    }

    pub async fn retry(&mut self) -> Result<(), ConfiguratorError> {
        self.configurator.retry()?;
        self.refresh().await;
        Ok(())
    }
}
