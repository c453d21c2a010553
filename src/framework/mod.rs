//! Generic keyed actor framework.
//!
//! This module provides the building blocks for hosting one actor per key: a registry
//! that guarantees at most one live actor per key, and the actor itself, which owns its
//! entity's state, serializes access to it, and terminates after an idle period.
//!
//! # Main Components
//!
//! - [`KeyedEntity`] - Trait that per-key state types implement to be hosted by actors
//! - [`EntityActor`] - The per-key actor loop (population, requests, idle timer)
//! - [`EntityHandle`] - Type-safe handle for sending requests to one actor
//! - [`EntitySupervisor`] - The key -> actor registry with find-or-create semantics
//! - [`RegistryConfig`] - Mailbox size, idle timeout, population retry policy
//! - [`FrameworkError`] - Common error types

pub mod actor;
pub mod config;
pub mod entity;
pub mod error;
pub mod handle;
pub mod message;
pub mod supervisor;

// Re-export core types for convenience
pub use actor::{EntityActor, ExitReason};
pub use config::{ConfigError, PopulatePolicy, RegistryConfig};
pub use entity::KeyedEntity;
pub use error::FrameworkError;
pub use handle::EntityHandle;
pub use message::{EntityRequest, Response};
pub use supervisor::EntitySupervisor;
