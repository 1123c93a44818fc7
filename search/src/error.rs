//! Typed search errors.
//!
//! `SearchError` covers policy validation and misuse of the step channel.
//! Normal terminations (goal reached, frontier exhausted) are not errors;
//! they surface as [`crate::step::Termination`].

/// Typed failure of the search engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// A policy option was selected that the chosen strategy cannot honour.
    #[error("unsupported policy: {detail}")]
    UnsupportedPolicy { detail: String },
    /// `step` was called before `start`.
    #[error("search has not been started")]
    NotStarted,
    /// `start` was called twice.
    #[error("search has already been started")]
    AlreadyStarted,
    /// `step` was called after `Done` was returned.
    #[error("search already finished")]
    Finished,
    /// `step` was called after the run was cancelled.
    #[error("search was cancelled")]
    Cancelled,
}
