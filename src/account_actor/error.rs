//! Error types for the Account actor.

use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccountError {
    /// No live actor for the account. Call `find_or_create` first.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// The actor for the account could not be spawned.
    #[error("Account creation failed: {0}")]
    CreationFailed(String),

    /// The data source could not provide the account's profile.
    #[error("Account source unavailable: {0}")]
    SourceUnavailable(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
