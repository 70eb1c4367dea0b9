//! Per-identifier outcomes of a bulk delete.

use std::collections::BTreeMap;

use comlab_core::{ApiError, Notice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed(ApiError),
}

impl DeleteOutcome {
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Result of deleting every selected teacher, keyed by identifier.
///
/// Every identifier is attempted regardless of earlier failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub outcomes: BTreeMap<String, DeleteOutcome>,
}

impl DeleteReport {
    pub fn record(&mut self, teacher_id: impl Into<String>, outcome: DeleteOutcome) {
        self.outcomes.insert(teacher_id.into(), outcome);
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn deleted(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_deleted()).count()
    }

    /// Identifiers whose delete call failed, in identifier order.
    #[must_use]
    pub fn failed_ids(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| !o.is_deleted())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    #[must_use]
    pub fn all_deleted(&self) -> bool {
        self.outcomes.values().all(DeleteOutcome::is_deleted)
    }

    /// The notice shown once the batch completes. `None` for an empty batch.
    #[must_use]
    pub fn summary(&self) -> Option<Notice> {
        if self.is_empty() {
            return None;
        }
        if self.all_deleted() {
            return Some(Notice::info(format!(
                "{} Teacher/s has been deleted.",
                self.attempted()
            )));
        }
        let failed = self.failed_ids();
        Some(Notice::error(format!(
            "{} of {} deleted; {} failed: {}",
            self.deleted(),
            self.attempted(),
            failed.len(),
            failed.join(", ")
        )))
    }
}
