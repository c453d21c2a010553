//! Account-specific entity logic: actions, errors, and the `KeyedEntity` implementation.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{EntitySupervisor, RegistryConfig};
use crate::model::Account;
use crate::source::SharedSource;

/// Creates a new Account supervisor reading from `source`.
pub fn new(config: RegistryConfig, source: SharedSource) -> EntitySupervisor<Account> {
    EntitySupervisor::new(config, source)
}
