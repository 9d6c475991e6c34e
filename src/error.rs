//! Error taxonomy for drag sessions and ordering commits
//!
//! Every variant is local and non-fatal: the update layer logs it and the
//! drag session returns to idle.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    /// The dragged item or the drop target is missing from the position cache
    /// or the record store. The move is dropped silently.
    #[error("not found: {0}")]
    NotFound(String),

    /// The view is read-only; drags are rejected before anything is cached.
    #[error("view is read-only")]
    ReadOnly,

    /// A drag is already armed or tracking.
    #[error("a drag session is already active")]
    SessionBusy,

    /// A detail-update or order-update round trip failed.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl DragError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        DragError::NotFound(what.to_string())
    }
}
