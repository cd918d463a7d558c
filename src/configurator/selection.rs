use crate::part::Part;
use crate::stage::Stage;

/// Parts chosen so far, one per stage, always a prefix of the stage list.
///
/// Only [`Configurator`](super::Configurator) pushes or truncates, so the
/// prefix shape holds by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    entries: Vec<(Stage, Part)>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected part for `stage`, if any.
    pub fn get(&self, stage: Stage) -> Option<&Part> {
        self.entries
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, part)| part)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selections in stage order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &Part)> {
        self.entries.iter().map(|(s, p)| (*s, p))
    }

    /// Selected parts in stage order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.entries.iter().map(|(_, p)| p)
    }

    /// Selected stages in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.entries.iter().map(|(s, _)| *s).collect()
    }

    pub(super) fn push(&mut self, stage: Stage, part: Part) {
        self.entries.push((stage, part));
    }

    /// Keep the first `len` selections, dropping the rest.
    pub(super) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<(Stage, Part)>) -> Self {
        Self { entries }
    }
}
