//! Domain validation errors for session types.
//!
//! Returned by `parse` constructors when an input violates an invariant of
//! the session model (password shape, image slug, hostname).

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Passwords are exactly eight lowercase hex characters.
    #[error("invalid session password `{0}`: expected 8 lowercase hex characters")]
    InvalidPassword(String),

    /// Image slugs become part of a container image name and a DNS label.
    #[error("invalid image `{value}`: {reason}")]
    InvalidImage {
        /// The rejected slug.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The sandbox must be reachable at a bare hostname.
    #[error("invalid host `{0}`: expected a bare hostname without scheme or path")]
    InvalidHost(String),
}
