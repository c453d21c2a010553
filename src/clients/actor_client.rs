use crate::framework::{EntitySupervisor, FrameworkError, KeyedEntity};
use async_trait::async_trait;

/// Trait for entity-specific clients to inherit the registry operations.
///
/// This trait reduces boilerplate by providing default implementations for the
/// operations every keyed entity shares: find-or-create, existence checks,
/// enumeration, and explicit stop.
#[async_trait]
pub trait ActorClient<T: KeyedEntity>: Send + Sync {
    /// The entity-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic EntitySupervisor.
    fn supervisor(&self) -> &EntitySupervisor<T>;

    /// Map framework errors to the specific entity error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Return the live actor's key, spawning the actor if needed.
    #[tracing::instrument(skip(self))]
    async fn find_or_create(&self, key: T::Key) -> Result<T::Key, Self::Error> {
        tracing::debug!("Sending request");
        self.supervisor().find_or_create(key).await.map_err(Self::map_error)
    }

    /// Stop the actor for `key`.
    #[tracing::instrument(skip(self))]
    async fn stop(&self, key: T::Key) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.supervisor().stop(&key).await.map_err(Self::map_error)
    }

    fn exists(&self, key: &T::Key) -> bool {
        self.supervisor().exists(key)
    }

    fn count(&self) -> usize {
        self.supervisor().count()
    }

    fn list_keys(&self) -> Vec<T::Key> {
        self.supervisor().list_keys()
    }
}
