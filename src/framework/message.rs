//! # Generic Messages
//!
//! This module defines the message types used for communication between an
//! [`EntityHandle`](crate::framework::EntityHandle) and its
//! [`EntityActor`](crate::framework::EntityActor).

use crate::framework::entity::KeyedEntity;
use crate::framework::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to a single entity actor.
///
/// Unlike a collection actor there is no id on the messages: the key is fixed when the
/// actor is spawned, and every request on the mailbox targets that one entity.
///
/// - **Get**: Snapshot of the current state. Never mutates, never touches the idle timer.
/// - **Action**: Executes a custom [`KeyedEntity::Action`]; may restart the idle timer.
/// - **Stop**: Acknowledge, then terminate the actor.
#[derive(Debug)]
pub enum EntityRequest<T: KeyedEntity> {
    Get {
        respond_to: Response<T>,
    },
    Action {
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Stop {
        respond_to: Response<()>,
    },
}
