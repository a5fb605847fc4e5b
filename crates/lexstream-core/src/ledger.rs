//! Ordered, step-keyed collection of progress updates.

use crate::types::ProgressUpdate;

/// Progress updates for one analysis run, keyed by step name.
///
/// A later update for an existing step fully replaces the earlier one in
/// place — the backend is the authority on a step's current state — while a
/// new step appends. First-seen position is preserved across replacements.
/// The whole ledger is cleared when a terminal event arrives or a new run
/// begins; entries are never removed individually.
#[derive(Debug, Default, Clone)]
pub struct ProgressLedger {
    entries: Vec<ProgressUpdate>,
}

impl ProgressLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-replace by `step`, preserving position on replace.
    pub fn upsert(&mut self, update: ProgressUpdate) {
        match self.entries.iter_mut().find(|e| e.step == update.step) {
            Some(existing) => *existing = update,
            None => self.entries.push(update),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current ordered sequence, for rendering.
    pub fn snapshot(&self) -> &[ProgressUpdate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
