//! Compensation tracking for multi-step writes against external services.
//!
//! Saving a reviewed item uploads up to two storage objects and then inserts
//! a row; none of these share a transaction. Each completed step registers a
//! compensation here, and a failure part-way through unwinds them in reverse
//! order so no orphaned object outlives a failed save.

use std::{future::Future, pin::Pin};

use tracing::warn;

type Compensation<'a> =
  Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

pub struct Saga<'a> {
  steps: Vec<(&'static str, Compensation<'a>)>,
}

impl<'a> Saga<'a> {
  pub fn new() -> Self {
    Self { steps: Vec::new() }
  }

  /// Register the undo for a step that just succeeded. `label` names the
  /// step for the log line if the undo ever runs.
  pub fn push<F>(&mut self, label: &'static str, undo: F)
  where
    F: Future<Output = Result<(), String>> + Send + 'a,
  {
    self.steps.push((label, Box::pin(undo)));
  }

  /// Drop all compensations; the whole sequence succeeded.
  pub fn commit(mut self) {
    self.steps.clear();
  }

  /// Run compensations newest-first. A failing compensation is logged and
  /// skipped; later (earlier-registered) ones still run.
  pub async fn unwind(self) {
    for (label, undo) in self.steps.into_iter().rev() {
      if let Err(reason) = undo.await {
        warn!(step = label, %reason, "compensation failed");
      }
    }
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.steps.len()
  }
}

impl Default for Saga<'_> {
  fn default() -> Self {
    Self::new()
  }
}
