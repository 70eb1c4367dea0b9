use comlab_core::{ApiError, FieldError, UnknownTeacher};

/// Errors returned by [`RosterViewModel`](super::RosterViewModel) actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// The identifier is not in the loaded roster.
    #[error(transparent)]
    NotFound(#[from] UnknownTeacher),
    /// The draft failed local validation; nothing was sent.
    #[error("draft has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),
    /// The roster API call failed; local state is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Submit or cancel was called with no edit in progress.
    #[error("no edit in progress")]
    EditNotOpen,
    /// A bulk action was requested with nothing selected.
    #[error("no teachers selected")]
    EmptySelection,
}
