//! Staging roster blocks for deletion.
//!
//! ```text
//! Idle -> Selecting -> Confirming -> Deleted -> Idle
//!                          \-> Failed -> Selecting
//! ```
//!
//! `confirm_delete` takes `&mut self` and holds the `Confirming` state for
//! the whole store call, so one staging instance never has two deletions in
//! flight.

use tracing::{debug, warn};

use crate::error::{RoosterError, RoosterResult};
use crate::repository::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingState {
    Idle,
    Selecting,
    Confirming,
}

#[derive(Debug)]
pub struct DeletionStaging {
    selected: Vec<String>,
    state: StagingState,
}

impl Default for DeletionStaging {
    fn default() -> Self {
        Self::new()
    }
}

impl DeletionStaging {
    pub fn new() -> Self {
        DeletionStaging {
            selected: Vec::new(),
            state: StagingState::Idle,
        }
    }

    pub fn state(&self) -> StagingState {
        self.state
    }

    /// Selected ids in toggle order.
    pub fn selection(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.to_string());
        }
        self.state = if self.selected.is_empty() {
            StagingState::Idle
        } else {
            StagingState::Selecting
        };
    }

    /// Add `id` unless it is already selected.
    pub fn select(&mut self, id: &str) {
        if !self.is_selected(id) {
            self.selected.push(id.to_string());
            self.state = StagingState::Selecting;
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.state = StagingState::Idle;
    }

    /// Ids that would be sent to the store: non-blank, in selection order.
    pub fn valid_ids(&self) -> RoosterResult<Vec<String>> {
        if self.selected.is_empty() {
            return Err(RoosterError::validation(
                "Select roster blocks to delete first",
            ));
        }

        let valid: Vec<String> = self
            .selected
            .iter()
            .filter(|id| !id.trim().is_empty())
            .cloned()
            .collect();

        if valid.is_empty() {
            return Err(RoosterError::validation("Nothing valid selected"));
        }
        Ok(valid)
    }

    /// Delete the valid selected ids. On success the selection is cleared and
    /// the deleted ids returned; callers must re-fetch the roster. On failure
    /// the selection is kept so the user can retry.
    pub async fn confirm_delete(&mut self, repo: &Repository<'_>) -> RoosterResult<Vec<String>> {
        if self.state == StagingState::Confirming {
            return Err(RoosterError::validation("A deletion is already in progress"));
        }

        let ids = self.valid_ids()?;
        self.state = StagingState::Confirming;
        debug!(count = ids.len(), "deleting roster blocks");

        let result = match repo.delete_assignments(&ids).await {
            Ok(outcome) => outcome.into_result(),
            Err(e) => Err(e),
        };

        match result {
            Ok(deleted) => {
                self.clear();
                Ok(deleted)
            }
            Err(e) => {
                warn!("roster block deletion failed: {e}");
                self.state = StagingState::Selecting;
                Err(e)
            }
        }
    }
}
