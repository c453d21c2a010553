//! KeyedEntity trait implementation for the Account domain type.
//!
//! This module contains the [`KeyedEntity`] trait implementation that lets each
//! [`Account`] live in its own [`crate::framework::EntityActor`].
//!
//! See the trait implementation on [`Account`] for method documentation.

use super::actions::{AccountAction, AccountActionResult};
use super::error::AccountError;
use crate::framework::KeyedEntity;
use crate::model::{Account, AccountId};
use crate::source::SharedSource;
use async_trait::async_trait;

#[async_trait]
impl KeyedEntity for Account {
    type Key = AccountId;
    type Action = AccountAction;
    type ActionResult = AccountActionResult;
    type Context = SharedSource;
    type Error = AccountError;

    fn new(key: AccountId) -> Self {
        Account::new(key)
    }

    /// Copies name, attribute and the starting order count from the data source.
    async fn populate(&mut self, source: &SharedSource) -> Result<(), AccountError> {
        let profile = source.fetch(self.id).await?;
        self.display_name = profile.display_name;
        self.auxiliary_attribute = profile.auxiliary_attribute;
        self.order_count = profile.counter_seed;
        self.degraded = false;
        Ok(())
    }

    /// Keeps the empty defaults and flags the account.
    fn on_populate_failed(&mut self, _error: &AccountError) {
        self.degraded = true;
    }

    /// Handles custom actions for the Account entity.
    ///
    /// # Actions
    /// - `GetOrderCount`: Returns the current order count
    /// - `Increment`: Adds one order and returns the new count
    async fn handle_action(
        &mut self,
        action: AccountAction,
        _source: &SharedSource,
    ) -> Result<AccountActionResult, AccountError> {
        match action {
            AccountAction::GetOrderCount => Ok(AccountActionResult::GetOrderCount(self.order_count)),
            AccountAction::Increment => {
                self.order_count += 1;
                Ok(AccountActionResult::Increment(self.order_count))
            }
        }
    }

    fn resets_idle_timer(action: &AccountAction) -> bool {
        matches!(action, AccountAction::Increment)
    }
}
