//! Type-safe wrappers around [`EntitySupervisor`](crate::framework::EntitySupervisor).

pub mod account_client;
pub mod actor_client;

pub use account_client::*;
pub use actor_client::*;
