//! # Framework Errors
//!
//! This module defines the common error types used throughout the keyed actor framework.
//! Domain clients map these into their own error enums (see [`crate::account_actor::AccountError`]).

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("No live actor for key {0}")]
    NotFound(String),
    #[error("An actor is already registered for key {0}")]
    AlreadyExists(String),
    #[error("Actor creation failed: {0}")]
    CreationFailed(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// True when the target actor is no longer there to answer.
    ///
    /// An actor that terminates while a request is queued drops the reply channel,
    /// so callers see `ActorClosed` or `ActorDropped` rather than `NotFound`.
    /// All three mean the same thing to a caller.
    pub fn is_gone(&self) -> bool {
        matches!(
            self,
            FrameworkError::NotFound(_) | FrameworkError::ActorClosed | FrameworkError::ActorDropped
        )
    }
}
