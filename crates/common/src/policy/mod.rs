//! Access and review ownership rules.
//!
//! These are pure checks over already loaded records; callers fetch,
//!  ask the policy, then write.

pub mod access;
pub mod ownership;

pub use access::{bearer_token, require_admin, AccessError};
pub use ownership::{
    authorize_delete, authorize_update, validate_changes, validate_draft, ReviewChanges,
    ReviewDraft,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// Malformed or out of range input
    #[error("{0}")]
    Invalid(String),
    /// The caller does not own the record and holds no role that overrides that
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    /// A second review by the same user for the same book
    #[error("{0}")]
    Duplicate(String),
}
