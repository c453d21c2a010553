use crate::clients::AccountClient;
use crate::framework::{EntitySupervisor, RegistryConfig};
use crate::model::Account;
use crate::source::{SharedSource, StaticAccountSource};
use std::sync::Arc;
use tracing::info;

/// The runtime orchestrator for the account registry.
///
/// `AccountSystem` is responsible for:
/// - **Lifecycle Management**: Creating the supervisor once and shutting it down
/// - **Dependency Wiring**: Handing the data source to every account actor
///
/// There is exactly one supervisor per system. It is passed explicitly to the client,
/// never stored in a global.
///
/// # Example
///
/// ```ignore
/// let system = AccountSystem::new();
///
/// system.accounts.find_or_create(AccountId(2)).await?;
/// system.accounts.increment(AccountId(2)).await?;
/// let report = system.accounts.list_report().await?;
///
/// // Gracefully shut down when done
/// system.shutdown().await;
/// ```
pub struct AccountSystem {
    /// Client for interacting with account actors
    pub accounts: AccountClient,

    supervisor: EntitySupervisor<Account>,
}

impl AccountSystem {
    /// Default configuration and the static data source.
    pub fn new() -> Self {
        Self::with_source(RegistryConfig::default(), Arc::new(StaticAccountSource::default()))
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_source(config, Arc::new(StaticAccountSource::default()))
    }

    pub fn with_source(config: RegistryConfig, source: SharedSource) -> Self {
        info!(idle_timeout = ?config.idle_timeout, mailbox_capacity = config.mailbox_capacity, "Starting account system");
        let supervisor = crate::account_actor::new(config, source);
        let accounts = AccountClient::new(supervisor.clone());
        Self {
            accounts,
            supervisor,
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Further `find_or_create` calls fail with `CreationFailed`; every live account actor
    /// is stopped and deregistered before this returns. Returns the number stopped.
    pub async fn shutdown(self) -> usize {
        info!("Shutting down system...");
        let stopped = self.supervisor.shutdown().await;
        info!(stopped, "System shutdown complete.");
        stopped
    }
}

impl Default for AccountSystem {
    fn default() -> Self {
        Self::new()
    }
}
