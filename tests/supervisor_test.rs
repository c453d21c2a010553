use account_registry::framework::{EntitySupervisor, FrameworkError, KeyedEntity, RegistryConfig};
use async_trait::async_trait;
use std::time::Duration;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Widget {
    id: u32,
    hits: u32,
}

#[derive(Debug)]
enum WidgetAction {
    Hit,
    Explode,
}

#[derive(Debug, thiserror::Error)]
#[error("Widget error")]
struct WidgetError;

#[async_trait]
impl KeyedEntity for Widget {
    type Key = u32;
    type Action = WidgetAction;
    type ActionResult = u32;
    type Context = ();
    type Error = WidgetError;

    fn new(id: u32) -> Self {
        Self { id, hits: 0 }
    }

    async fn handle_action(&mut self, action: WidgetAction, _ctx: &()) -> Result<u32, WidgetError> {
        match action {
            WidgetAction::Hit => {
                self.hits += 1;
                Ok(self.hits)
            }
            WidgetAction::Explode => panic!("widget {} exploded", self.id),
        }
    }
}

fn supervisor() -> EntitySupervisor<Widget> {
    EntitySupervisor::new(RegistryConfig::default(), ())
}

fn supervisor_with_timeout(idle_timeout: Duration) -> EntitySupervisor<Widget> {
    EntitySupervisor::new(RegistryConfig::default().with_idle_timeout(idle_timeout), ())
}

async fn wait_until_gone(supervisor: &EntitySupervisor<Widget>, key: u32) -> bool {
    for _ in 0..200 {
        if !supervisor.exists(&key) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

// --- Tests ---

#[tokio::test]
async fn test_crashed_actor_is_deregistered_and_recreated_fresh() {
    let supervisor = supervisor();
    supervisor.find_or_create(1).await.unwrap();
    supervisor.perform_action(&1, WidgetAction::Hit).await.unwrap();

    let crashed = supervisor.perform_action(&1, WidgetAction::Explode).await;
    assert!(matches!(crashed, Err(FrameworkError::NotFound(_))));
    assert!(wait_until_gone(&supervisor, 1).await);

    supervisor.find_or_create(1).await.unwrap();
    assert_eq!(supervisor.perform_action(&1, WidgetAction::Hit).await.unwrap(), 1);
    assert_eq!(supervisor.shutdown().await, 1);
}

/// The old actor's watcher fires after a newer actor took the key; it must not remove it.
#[tokio::test]
async fn test_stale_termination_does_not_remove_newer_actor() {
    let supervisor = supervisor();
    supervisor.find_or_create(5).await.unwrap();
    let first = supervisor.lookup(&5).unwrap().instance();

    supervisor.stop(&5).await.unwrap();
    supervisor.find_or_create(5).await.unwrap();
    let second = supervisor.lookup(&5).unwrap().instance();
    assert_ne!(first, second);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(supervisor.exists(&5));
    assert_eq!(supervisor.lookup(&5).unwrap().instance(), second);
    assert_eq!(supervisor.perform_action(&5, WidgetAction::Hit).await.unwrap(), 1);

    supervisor.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creation_across_keys() {
    let supervisor = supervisor();
    let mut tasks = vec![];
    for _ in 0..10 {
        for key in 0..20u32 {
            let supervisor = supervisor.clone();
            tasks.push(tokio::spawn(async move { supervisor.find_or_create(key).await }));
        }
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(supervisor.count(), 20);
    assert_eq!(supervisor.list_keys(), (0..20).collect::<Vec<u32>>());
    let handles = supervisor.handles();
    assert_eq!(handles.len(), 20);
    assert!(handles.windows(2).all(|pair| pair[0].key() < pair[1].key()));

    assert_eq!(supervisor.shutdown().await, 20);
    assert_eq!(supervisor.count(), 0);
}

#[tokio::test]
async fn test_snapshot_and_missing_key() {
    let supervisor = supervisor();
    assert!(matches!(supervisor.get(&3).await, Err(FrameworkError::NotFound(_))));
    assert!(supervisor.lookup(&3).is_none());

    supervisor.find_or_create(3).await.unwrap();
    supervisor.perform_action(&3, WidgetAction::Hit).await.unwrap();
    assert_eq!(supervisor.get(&3).await.unwrap(), Widget { id: 3, hits: 1 });

    supervisor.shutdown().await;
}

/// Handles taken before a stop fail with a "gone" error instead of hanging.
#[tokio::test]
async fn test_stale_handle_fails_fast() {
    let supervisor = supervisor();
    supervisor.find_or_create(9).await.unwrap();
    let handle = supervisor.lookup(&9).unwrap();

    supervisor.stop(&9).await.unwrap();
    let result = tokio::time::timeout(Duration::from_secs(1), handle.perform_action(WidgetAction::Hit))
        .await
        .expect("request to a stopped actor must not block");
    assert!(result.unwrap_err().is_gone());
}

#[tokio::test]
async fn test_shutdown_closes_creation() {
    let supervisor = supervisor();
    supervisor.find_or_create(1).await.unwrap();
    assert_eq!(supervisor.shutdown().await, 1);

    let result = supervisor.find_or_create(1).await;
    assert!(matches!(result, Err(FrameworkError::CreationFailed(_))));
    assert_eq!(supervisor.shutdown().await, 0);
}

/// A stop sent straight to the handle bypasses the supervisor; only the watcher would
/// deregister it. Reads and creation must not wait for that.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_find_or_create_right_after_direct_stop() {
    let supervisor = supervisor();
    for _ in 0..200 {
        supervisor.find_or_create(7).await.unwrap();
        assert_eq!(supervisor.perform_action(&7, WidgetAction::Hit).await.unwrap(), 1);

        supervisor.lookup(&7).unwrap().stop().await.unwrap();
        assert_eq!(supervisor.count(), 0);
        assert!(supervisor.list_keys().is_empty());
        assert!(!supervisor.exists(&7));
    }
    supervisor.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_find_or_create_right_after_expiry() {
    let supervisor = supervisor_with_timeout(Duration::from_millis(50));
    for key in 0..20u32 {
        supervisor.find_or_create(key).await.unwrap();
        supervisor.perform_action(&key, WidgetAction::Hit).await.unwrap();

        let expired = supervisor.lookup(&key).unwrap();
        while !expired.is_closed() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        // The watcher may not have run yet; the dead entry must still be skipped.
        supervisor.find_or_create(key).await.unwrap();
        let fresh = supervisor.lookup(&key).unwrap();
        assert_ne!(fresh.instance(), expired.instance());
        assert_eq!(supervisor.perform_action(&key, WidgetAction::Hit).await.unwrap(), 1);
    }
    supervisor.shutdown().await;
}
