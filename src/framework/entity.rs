//! # KeyedEntity Trait
//!
//! The `KeyedEntity` trait defines the contract that every per-key state record must
//! implement to be hosted by an [`EntityActor`](crate::framework::EntityActor). One actor
//! owns exactly one entity; the [`EntitySupervisor`](crate::framework::EntitySupervisor)
//! maps keys to those actors.
//!
//! # Architecture Note
//! The actor loop, the idle timer and the registry are written *once* against this trait.
//! A domain type (e.g. [`Account`](crate::model::Account)) only supplies:
//! - how to build its empty state from a key ([`KeyedEntity::new`]),
//! - how to fill it from an external collaborator ([`KeyedEntity::populate`]),
//! - what its custom actions do ([`KeyedEntity::handle_action`]),
//! - which actions count as activity for the idle timer ([`KeyedEntity::resets_idle_timer`]).
//!
//! # Provided Methods (Hooks)
//! [`KeyedEntity::populate`], [`KeyedEntity::on_populate_failed`] and
//! [`KeyedEntity::resets_idle_timer`] have default implementations. You do **not** need to
//! implement them unless you want to customize behavior.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any per-key entity must implement to be managed by an `EntityActor`.
///
/// # Async & Context
/// This trait is `#[async_trait]` so hooks can await external collaborators. The
/// `Context` type is injected into every hook when the actor starts running, the same
/// "late binding" the supervisor uses to hand each new actor its dependencies.
#[async_trait]
pub trait KeyedEntity: Clone + Send + Sync + 'static {
    /// Caller-supplied identifier. Never generated internally.
    /// `Ord` gives the registry its ascending enumeration order.
    type Key: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// Enum representing entity-specific operations (e.g. `Increment`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// It is cloned once per spawned actor, so keep it cheap (an `Arc`, a client).
    type Context: Clone + Send + Sync + 'static;

    /// The error type for this entity.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the initial, unpopulated state for `key`.
    fn new(key: Self::Key) -> Self;

    // --- Lifecycle Hooks (Async) ---

    /// Fill the entity from its data source. Runs as the first unit of work of the
    /// actor, before any queued request is served. Retried by the actor on failure.
    async fn populate(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once after the last population attempt failed.
    /// The actor keeps running with whatever state this hook leaves behind.
    fn on_populate_failed(&mut self, _error: &Self::Error) {}

    // --- Action Handler (Async) ---

    /// Handle a custom entity-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Whether a successful `action` counts as activity and restarts the idle timer.
    fn resets_idle_timer(_action: &Self::Action) -> bool {
        true
    }
}
