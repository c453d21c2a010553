//! Custom actions for the Account actor.
//!
//! These actions are handled by
//! [`KeyedEntity::handle_action`](crate::framework::KeyedEntity::handle_action).
//! Only [`AccountAction::Increment`] counts as activity for the idle timer: an account
//! falls off the registry when no order has been placed for a full idle period.

/// Custom actions for Account entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    /// Reads the order count without modifying it.
    GetOrderCount,
    /// Records one more order. Restarts the idle timer.
    Increment,
}

/// Results from AccountActions - variants match 1:1 with AccountAction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountActionResult {
    /// Current order count
    GetOrderCount(u64),
    /// Order count after the increment
    Increment(u64),
}
