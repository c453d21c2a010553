use std::fmt::Display;

/// Type-safe identifier for Accounts. Supplied by the caller, never generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub u64);

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "account_{}", self.0)
    }
}

/// Represents one account and the orders placed against it.
///
/// # Actor Framework
/// This struct implements the [`KeyedEntity`](crate::framework::KeyedEntity) trait,
/// allowing each account to live in its own [`EntityActor`](crate::framework::EntityActor).
///
/// See [`impl KeyedEntity for Account`](#impl-KeyedEntity-for-Account) for details on:
/// - Population from an [`AccountSource`](crate::source::AccountSource)
/// - Custom actions ([`AccountAction`](crate::account_actor::AccountAction))
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub display_name: String,
    pub auxiliary_attribute: String,
    /// Number of orders. Only ever incremented.
    pub order_count: u64,
    /// Set when the data source could not be reached at start-up.
    pub degraded: bool,
}

impl Account {
    /// An unpopulated account: empty name and attribute, zero orders.
    pub fn new(id: impl Into<AccountId>) -> Self {
        Self {
            id: id.into(),
            display_name: String::new(),
            auxiliary_attribute: String::new(),
            order_count: 0,
            degraded: false,
        }
    }

    pub fn details(&self) -> AccountDetails {
        AccountDetails {
            id: self.id,
            display_name: self.display_name.clone(),
            auxiliary_attribute: self.auxiliary_attribute.clone(),
            order_count: self.order_count,
            degraded: self.degraded,
        }
    }
}

/// What the data source knows about an account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub display_name: String,
    pub auxiliary_attribute: String,
    pub counter_seed: u64,
}

/// Snapshot returned by `get_details`.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDetails {
    pub id: AccountId,
    pub display_name: String,
    pub auxiliary_attribute: String,
    pub order_count: u64,
    pub degraded: bool,
}

/// One line of the order report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportEntry {
    pub id: AccountId,
    pub order_count: u64,
}

impl From<(u64, u64)> for ReportEntry {
    fn from((id, order_count): (u64, u64)) -> Self {
        Self {
            id: AccountId(id),
            order_count,
        }
    }
}
