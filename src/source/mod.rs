//! The data source an account reads from when its actor starts.
//!
//! The real collaborator (a customer database, a CRM) lives outside this crate. Actors
//! only see the [`AccountSource`] trait; [`StaticAccountSource`] is the stand-in used by
//! the demo and most tests, and [`mock::MockSource`] scripts failures.

pub mod mock;

use crate::account_actor::AccountError;
use crate::model::{AccountId, AccountProfile};
use async_trait::async_trait;
use std::sync::Arc;

/// Looks up the externally-held attributes of an account.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Called once per actor, at population time.
    async fn fetch(&self, id: AccountId) -> Result<AccountProfile, AccountError>;
}

/// Shared handle to a data source; this is the context every account actor receives.
pub type SharedSource = Arc<dyn AccountSource>;

/// A source that never fails and derives everything from the id.
#[derive(Debug, Clone)]
pub struct StaticAccountSource {
    counter_seed: u64,
}

impl StaticAccountSource {
    pub fn new(counter_seed: u64) -> Self {
        Self { counter_seed }
    }
}

impl Default for StaticAccountSource {
    fn default() -> Self {
        Self::new(1)
    }
}

#[async_trait]
impl AccountSource for StaticAccountSource {
    async fn fetch(&self, id: AccountId) -> Result<AccountProfile, AccountError> {
        Ok(AccountProfile {
            display_name: format!("Account {}", id.0),
            auxiliary_attribute: "standard".to_string(),
            counter_seed: self.counter_seed,
        })
    }
}
