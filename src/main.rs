//! Demo: two accounts, one order, a report, and a clean shutdown.

use account_registry::account_actor::AccountError;
use account_registry::clients::ActorClient;
use account_registry::framework::RegistryConfig;
use account_registry::lifecycle::{setup_tracing, AccountSystem};
use account_registry::model::AccountId;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), AccountError> {
    setup_tracing();

    let config = RegistryConfig::load().map_err(|e| AccountError::CreationFailed(e.to_string()))?;
    let system = AccountSystem::with_config(config);
    let accounts = &system.accounts;

    let span = tracing::info_span!("account_creation");
    async {
        for id in [AccountId(2), AccountId(10)] {
            accounts.find_or_create(id).await?;
        }
        Ok::<_, AccountError>(())
    }
    .instrument(span)
    .await?;

    info!(report = ?accounts.list_report().await?, "Initial report");

    let span = tracing::info_span!("order_processing");
    let count = accounts.increment(AccountId(10)).instrument(span).await?;
    info!(account = %AccountId(10), count, "Order recorded");

    // Idempotent: no new actor, no change to the report.
    accounts.find_or_create(AccountId(10)).await?;
    info!(report = ?accounts.list_report().await?, live = accounts.count(), "Report after order");

    let stopped = system.shutdown().await;
    info!(stopped, "Application completed successfully");
    Ok(())
}
