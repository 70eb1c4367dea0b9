//! Modal surfaces owned by the roster view-model.

use comlab_core::{EditDraft, ValidationResult};

/// Edit dialog state machine.
///
/// `Closed -> Open -> Submitting -> Closed` on success,
/// `Submitting -> Open { error }` on API failure, `Open -> Closed` on cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSurface {
    #[default]
    Closed,
    Open {
        draft: EditDraft,
        /// Result of the last local validation; `Valid` until a submit fails it.
        validation: ValidationResult,
        /// Message of the last failed API call, if any.
        error: Option<String>,
    },
    Submitting {
        draft: EditDraft,
    },
}

impl EditSurface {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// The draft being edited or submitted.
    #[must_use]
    pub fn draft(&self) -> Option<&EditDraft> {
        match self {
            Self::Closed => None,
            Self::Open { draft, .. } | Self::Submitting { draft } => Some(draft),
        }
    }
}

/// Bulk-delete confirmation dialog text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub count: usize,
}

impl DeleteConfirmation {
    #[must_use]
    pub fn title(&self) -> String {
        format!("Delete ({})", self.count)
    }

    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "Are you sure you want to delete {} teacher(s)?",
            self.count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_surface_has_no_draft() {
        assert!(!EditSurface::Closed.is_open());
        assert!(EditSurface::Closed.draft().is_none());
    }

    #[test]
    fn confirmation_text() {
        let confirm = DeleteConfirmation { count: 3 };
        assert_eq!(confirm.title(), "Delete (3)");
        assert_eq!(
            confirm.description(),
            "Are you sure you want to delete 3 teacher(s)?"
        );
    }
}
