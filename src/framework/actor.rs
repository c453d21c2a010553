//! # Per-Key Actor
//!
//! This module defines the `EntityActor`, the task that owns one entity's state. It
//! implements the "Server" side of the Actor Model: a single loop drains the mailbox, so
//! no two requests for the same key ever run against the state at the same time.
//!
//! The loop also owns the idle timer. The timer is a pinned [`tokio::time::Sleep`]; a
//! qualifying action resets it in place from inside the loop, so a cancelled deadline can
//! never fire after the reset.

use crate::framework::config::{PopulatePolicy, RegistryConfig};
use crate::framework::entity::KeyedEntity;
use crate::framework::error::FrameworkError;
use crate::framework::handle::EntityHandle;
use crate::framework::message::EntityRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Why an actor's loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The idle timer elapsed with no qualifying activity.
    Expired,
    /// A `Stop` request was processed.
    Stopped,
    /// Every handle was dropped.
    Closed,
}

/// The actor that owns a single keyed entity.
///
/// # Lifecycle
///
/// 1. **Populate**: [`KeyedEntity::populate`] runs first, retried per [`PopulatePolicy`].
///    Requests that arrive meanwhile wait in the mailbox.
/// 2. **Serve**: requests are processed one at a time. A successful action for which
///    [`KeyedEntity::resets_idle_timer`] returns true pushes the deadline to
///    `now + idle_timeout`.
/// 3. **Terminate**: on timer expiry, on `Stop`, or when every handle is gone. The
///    mailbox is closed first so senders fail fast instead of queueing behind a dead loop.
pub struct EntityActor<T: KeyedEntity> {
    key: T::Key,
    receiver: mpsc::Receiver<EntityRequest<T>>,
    entity: T,
    idle_timeout: Duration,
    populate_policy: PopulatePolicy,
}

impl<T: KeyedEntity> EntityActor<T> {
    /// Creates a new `EntityActor` for `key` and its associated `EntityHandle`.
    ///
    /// The actor does nothing until [`EntityActor::run`] is spawned.
    pub fn new(key: T::Key, instance: u64, config: &RegistryConfig) -> (Self, EntityHandle<T>) {
        let (sender, receiver) = mpsc::channel(config.mailbox_capacity.max(1));
        let actor = Self {
            key: key.clone(),
            receiver,
            entity: T::new(key.clone()),
            idle_timeout: config.idle_timeout,
            populate_policy: config.populate.clone(),
        };
        let handle = EntityHandle::new(key, instance, sender);
        (actor, handle)
    }

    /// Runs the actor's event loop until it expires, is stopped, or loses all handles.
    pub async fn run(mut self, context: T::Context) -> ExitReason {
        let entity_type = entity_type::<T>();
        let key = self.key.clone();
        info!(entity_type, %key, "Actor started");

        self.populate(&context, entity_type).await;

        let expiry = tokio::time::sleep(self.idle_timeout);
        tokio::pin!(expiry);

        let reason = loop {
            tokio::select! {
                biased;

                () = &mut expiry => {
                    info!(entity_type, %key, "Idle timeout elapsed");
                    break ExitReason::Expired;
                }
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else {
                        break ExitReason::Closed;
                    };
                    match msg {
                        EntityRequest::Get { respond_to } => {
                            debug!(entity_type, %key, "Get");
                            let _ = respond_to.send(Ok(self.entity.clone()));
                        }
                        EntityRequest::Action { action, respond_to } => {
                            debug!(entity_type, %key, ?action, "Action");
                            let touches = T::resets_idle_timer(&action);
                            let result = self
                                .entity
                                .handle_action(action, &context)
                                .await
                                .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                            match &result {
                                Ok(_) => {
                                    if touches {
                                        expiry.as_mut().reset(Instant::now() + self.idle_timeout);
                                        debug!(entity_type, %key, "Idle timer reset");
                                    }
                                    info!(entity_type, %key, "Action ok");
                                }
                                Err(e) => warn!(entity_type, %key, error = %e, "Action failed"),
                            }
                            let _ = respond_to.send(result);
                        }
                        EntityRequest::Stop { respond_to } => {
                            info!(entity_type, %key, "Stop requested");
                            // Close before acknowledging so the handle reads as closed once `stop` returns.
                            self.receiver.close();
                            let _ = respond_to.send(Ok(()));
                            break ExitReason::Stopped;
                        }
                    }
                }
            }
        };

        self.receiver.close();
        info!(entity_type, %key, ?reason, "Shutdown");
        reason
    }

    async fn populate(&mut self, context: &T::Context, entity_type: &'static str) {
        let attempts = self.populate_policy.attempts();
        let mut attempt = 1;
        loop {
            match self.entity.populate(context).await {
                Ok(()) => {
                    info!(entity_type, key = %self.key, attempt, "Populated");
                    return;
                }
                Err(e) if attempt < attempts => {
                    let delay = self.populate_policy.delay_for_attempt(attempt);
                    warn!(entity_type, key = %self.key, attempt, error = %e, ?delay, "Populate failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(entity_type, key = %self.key, attempt, error = %e, "Populate failed, serving degraded state");
                    self.entity.on_populate_failed(&e);
                    return;
                }
            }
        }
    }
}

/// Extract just the type name (e.g., "Account" instead of "account_registry::model::account::Account").
pub(crate) fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Tally {
        key: u32,
        label: String,
        count: u32,
    }

    #[derive(Debug)]
    enum TallyAction {
        Bump,
        Peek,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("label source down")]
    struct TallyError;

    /// Fails the first `failures` population attempts.
    #[derive(Clone, Default)]
    struct FlakySource {
        failures: u32,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl KeyedEntity for Tally {
        type Key = u32;
        type Action = TallyAction;
        type ActionResult = u32;
        type Context = FlakySource;
        type Error = TallyError;

        fn new(key: u32) -> Self {
            Self {
                key,
                label: String::new(),
                count: 0,
            }
        }

        async fn populate(&mut self, ctx: &FlakySource) -> Result<(), TallyError> {
            let call = ctx.calls.fetch_add(1, Ordering::SeqCst);
            if call < ctx.failures {
                return Err(TallyError);
            }
            self.label = format!("tally-{}", self.key);
            Ok(())
        }

        fn on_populate_failed(&mut self, _error: &TallyError) {
            self.label = "degraded".to_string();
        }

        async fn handle_action(&mut self, action: TallyAction, _ctx: &FlakySource) -> Result<u32, TallyError> {
            match action {
                TallyAction::Bump => {
                    self.count += 1;
                    Ok(self.count)
                }
                TallyAction::Peek => Ok(self.count),
            }
        }

        fn resets_idle_timer(action: &TallyAction) -> bool {
            matches!(action, TallyAction::Bump)
        }
    }

    fn fast_config() -> RegistryConfig {
        RegistryConfig::default().with_populate_policy(PopulatePolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        })
    }

    #[tokio::test]
    async fn test_requests_queue_behind_population() {
        let source = FlakySource {
            failures: 2,
            ..Default::default()
        };
        let (actor, handle) = EntityActor::<Tally>::new(7, 1, &fast_config());
        tokio::spawn(actor.run(source.clone()));

        // Sent before population has finished; must observe the populated label.
        let snapshot = handle.get().await.unwrap();
        assert_eq!(snapshot.label, "tally-7");
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_population_exhaustion_degrades() {
        let source = FlakySource {
            failures: u32::MAX,
            ..Default::default()
        };
        let (actor, handle) = EntityActor::<Tally>::new(1, 1, &fast_config());
        tokio::spawn(actor.run(source.clone()));

        let snapshot = handle.get().await.unwrap();
        assert_eq!(snapshot.label, "degraded");
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);

        // Still serves requests.
        assert_eq!(handle.perform_action(TallyAction::Bump).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_serialized_actions() {
        let (actor, handle) = EntityActor::<Tally>::new(3, 1, &fast_config());
        tokio::spawn(actor.run(FlakySource::default()));

        let mut tasks = vec![];
        for _ in 0..100 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle.perform_action(TallyAction::Bump).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(handle.perform_action(TallyAction::Peek).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_stop_acknowledges_then_closes() {
        let (actor, handle) = EntityActor::<Tally>::new(9, 1, &fast_config());
        let task = tokio::spawn(actor.run(FlakySource::default()));

        handle.stop().await.unwrap();
        assert!(handle.is_closed());
        assert_eq!(task.await.unwrap(), ExitReason::Stopped);
        assert!(handle.get().await.unwrap_err().is_gone());
    }

    #[tokio::test]
    async fn test_expires_when_idle() {
        let config = fast_config().with_idle_timeout(Duration::from_millis(50));
        let (actor, handle) = EntityActor::<Tally>::new(5, 1, &config);
        let task = tokio::spawn(actor.run(FlakySource::default()));

        // Reads do not count as activity.
        handle.perform_action(TallyAction::Peek).await.unwrap();
        assert_eq!(task.await.unwrap(), ExitReason::Expired);
        assert!(handle.perform_action(TallyAction::Peek).await.unwrap_err().is_gone());
    }

    #[tokio::test]
    async fn test_exits_when_all_handles_dropped() {
        let (actor, handle) = EntityActor::<Tally>::new(2, 1, &fast_config());
        let task = tokio::spawn(actor.run(FlakySource::default()));
        drop(handle);
        assert_eq!(task.await.unwrap(), ExitReason::Closed);
    }

    #[test]
    fn test_entity_type_name() {
        assert_eq!(entity_type::<Tally>(), "Tally");
    }
}
