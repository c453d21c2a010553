//! # Entity Handle
//!
//! The "client" half of a single entity actor. The registry stores one handle per live
//! key; callers clone it out of the registry and talk to the actor directly, so steady
//! state traffic never funnels through the supervisor.

use crate::framework::entity::KeyedEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::EntityRequest;
use tokio::sync::{mpsc, oneshot};

/// A type-safe handle for one running [`EntityActor`](crate::framework::EntityActor).
///
/// The handle also carries the reverse mapping back to its key, and the instance number
/// the supervisor assigned when the actor was spawned. Two actors that lived for the same
/// key at different times never share an instance number.
#[derive(Clone)]
pub struct EntityHandle<T: KeyedEntity> {
    key: T::Key,
    instance: u64,
    sender: mpsc::Sender<EntityRequest<T>>,
}

impl<T: KeyedEntity> EntityHandle<T> {
    pub fn new(key: T::Key, instance: u64, sender: mpsc::Sender<EntityRequest<T>>) -> Self {
        Self {
            key,
            instance,
            sender,
        }
    }

    pub fn key(&self) -> &T::Key {
        &self.key
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// True once the actor has stopped accepting requests.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Snapshot of the entity state.
    pub async fn get(&self) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EntityRequest::Get { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn perform_action(&self, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EntityRequest::Action { action, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Ask the actor to terminate. Resolves once the actor has acknowledged.
    pub async fn stop(&self) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EntityRequest::Stop { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
