use account_registry::account_actor::AccountError;
use account_registry::clients::ActorClient;
use account_registry::framework::{PopulatePolicy, RegistryConfig};
use account_registry::lifecycle::AccountSystem;
use account_registry::model::{AccountId, AccountProfile};
use account_registry::source::mock::MockSource;
use std::time::Duration;

fn fast_retry_config() -> RegistryConfig {
    RegistryConfig::default().with_populate_policy(PopulatePolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(5),
    })
}

fn gold_profile() -> AccountProfile {
    AccountProfile {
        display_name: "Alice".to_string(),
        auxiliary_attribute: "gold".to_string(),
        counter_seed: 10,
    }
}

/// Real account actor, scripted data source.
#[tokio::test]
async fn test_population_uses_source_profile() {
    let mut source = MockSource::new();
    source.expect_fetch(AccountId(1)).return_ok(gold_profile());

    let system = AccountSystem::with_source(fast_retry_config(), source.source());
    system.accounts.find_or_create(AccountId(1)).await.unwrap();

    let details = system.accounts.get_details(AccountId(1)).await.unwrap();
    assert_eq!(details.display_name, "Alice");
    assert_eq!(details.auxiliary_attribute, "gold");
    assert_eq!(details.order_count, 10);
    assert!(!details.degraded);
    assert_eq!(system.accounts.increment(AccountId(1)).await, Ok(11));

    source.verify();
    system.shutdown().await;
}

#[tokio::test]
async fn test_population_retries_transient_failures() {
    let mut source = MockSource::new();
    source
        .expect_fetch(AccountId(2))
        .return_err(AccountError::SourceUnavailable("timeout".into()));
    source
        .expect_fetch(AccountId(2))
        .return_err(AccountError::SourceUnavailable("timeout".into()));
    source.expect_fetch(AccountId(2)).return_ok(gold_profile());

    let system = AccountSystem::with_source(fast_retry_config(), source.source());
    system.accounts.find_or_create(AccountId(2)).await.unwrap();

    // Queued behind the retries; sees the populated state.
    let details = system.accounts.get_details(AccountId(2)).await.unwrap();
    assert_eq!(details.display_name, "Alice");
    assert!(!details.degraded);

    source.verify();
    system.shutdown().await;
}

#[tokio::test]
async fn test_population_exhaustion_serves_degraded_account() {
    let mut source = MockSource::new();
    for _ in 0..3 {
        source
            .expect_fetch(AccountId(3))
            .return_err(AccountError::SourceUnavailable("down".into()));
    }

    let system = AccountSystem::with_source(fast_retry_config(), source.source());
    system.accounts.find_or_create(AccountId(3)).await.unwrap();

    let details = system.accounts.get_details(AccountId(3)).await.unwrap();
    assert!(details.degraded);
    assert_eq!(details.display_name, "");
    assert_eq!(details.order_count, 0);

    // Degraded accounts still take orders.
    assert_eq!(system.accounts.increment(AccountId(3)).await, Ok(1));
    assert!(system.accounts.is_alive(AccountId(3)));

    source.verify();
    system.shutdown().await;
}
