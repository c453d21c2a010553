//! Runtime orchestration and lifecycle management.
//!
//! - [`AccountSystem`] - creates the supervisor, wires the data source, shuts down
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod account_system;
pub mod tracing;

pub use account_system::*;
pub use self::tracing::*;
