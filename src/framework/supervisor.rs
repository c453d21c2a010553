//! # Entity Supervisor
//!
//! The supervisor owns the key -> actor registry. It is the only component that spawns
//! actors, and it watches every actor it spawns so the registry entry disappears when
//! the actor does, whatever the cause.
//!
//! ## Registration
//!
//! The registry is a [`DashMap`]. Registration goes through the map's `entry` API, which
//! holds the shard lock for that key only while testing and inserting. That check-and-insert
//! is the single critical section in the system; lookups and per-actor traffic never block
//! on each other across keys.
//!
//! ## Deregistration
//!
//! Every entry records the instance number of the actor it points at. Removal is always
//! `remove_if(instance matches)`, and the termination watcher, [`EntitySupervisor::stop`] and
//! every read path go through it. Whichever runs first removes the entry; the others are
//! no-ops. A newer actor registered under the same key is never touched by a stale path.
//!
//! An actor closes its mailbox before its task ends, so there is a window where the entry
//! still exists but the actor is gone. Read paths treat a closed handle as absent and remove
//! it on the spot instead of waiting for the watcher.

use crate::framework::actor::{entity_type, EntityActor, ExitReason};
use crate::framework::config::RegistryConfig;
use crate::framework::entity::KeyedEntity;
use crate::framework::error::FrameworkError;
use crate::framework::handle::EntityHandle;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Shared registry state. Watchers hold an `Arc` to it, never the supervisor itself.
struct Registry<T: KeyedEntity> {
    entries: DashMap<T::Key, EntityHandle<T>>,
    /// Signalled after every removal; `shutdown` waits on it.
    removed: Notify,
}

impl<T: KeyedEntity> Registry<T> {
    /// Atomic test-and-set for `key`.
    fn register(&self, handle: EntityHandle<T>) -> Result<(), FrameworkError> {
        match self.entries.entry(handle.key().clone()) {
            Entry::Occupied(existing) => Err(FrameworkError::AlreadyExists(existing.key().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    /// Removes the entry only if it still belongs to `instance`. Returns true if it did.
    fn deregister(&self, key: &T::Key, instance: u64) -> bool {
        let removed = self
            .entries
            .remove_if(key, |_, handle| handle.instance() == instance)
            .is_some();
        if removed {
            self.removed.notify_waiters();
        }
        removed
    }
}

/// Supervises one actor per key for entity type `T`.
///
/// Cloning is cheap; all clones share the same registry. Create one per process at
/// startup and pass it to whatever needs to spawn or find actors.
pub struct EntitySupervisor<T: KeyedEntity> {
    registry: Arc<Registry<T>>,
    context: T::Context,
    config: Arc<RegistryConfig>,
    next_instance: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
}

impl<T: KeyedEntity> Clone for EntitySupervisor<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            context: self.context.clone(),
            config: Arc::clone(&self.config),
            next_instance: Arc::clone(&self.next_instance),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<T: KeyedEntity> EntitySupervisor<T> {
    /// Creates an empty supervisor. `context` is cloned into every actor it spawns.
    pub fn new(config: RegistryConfig, context: T::Context) -> Self {
        Self {
            registry: Arc::new(Registry {
                entries: DashMap::new(),
                removed: Notify::new(),
            }),
            context,
            config: Arc::new(config),
            next_instance: Arc::new(AtomicU64::new(1)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the live actor for `key`, spawning one if there is none.
    ///
    /// Concurrent calls for the same key resolve to a single actor. A caller that loses
    /// the registration race discards its unspawned actor and returns the winner's key.
    pub async fn find_or_create(&self, key: T::Key) -> Result<T::Key, FrameworkError> {
        let entity_type = entity_type::<T>();
        loop {
            if self.live_handle(&key).is_some() {
                debug!(entity_type, %key, "Found existing actor");
                return Ok(key);
            }
            if self.closed.load(Ordering::Acquire) {
                return Err(FrameworkError::CreationFailed(format!(
                    "supervisor is shut down, cannot create {key}"
                )));
            }

            let instance = self.next_instance.fetch_add(1, Ordering::Relaxed);
            let (actor, handle) = EntityActor::<T>::new(key.clone(), instance, &self.config);

            match self.registry.register(handle) {
                Ok(()) => {
                    self.spawn(key.clone(), instance, actor);
                    info!(entity_type, %key, instance, size = self.registry.entries.len(), "Created");
                    return Ok(key);
                }
                Err(FrameworkError::AlreadyExists(_)) => {
                    // Unspawned actor is dropped here; retry as a lookup.
                    debug!(entity_type, %key, instance, "Lost registration race");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Runs the actor and a watcher that deregisters it when its task ends.
    /// Registration happens before this, so a fast-exiting actor cannot leave a stale entry.
    fn spawn(&self, key: T::Key, instance: u64, actor: EntityActor<T>) {
        let task: JoinHandle<ExitReason> = tokio::spawn(actor.run(self.context.clone()));
        let registry = Arc::clone(&self.registry);
        tokio::spawn(async move {
            let entity_type = entity_type::<T>();
            match task.await {
                Ok(reason) => debug!(entity_type, %key, instance, ?reason, "Actor exited"),
                Err(e) if e.is_panic() => error!(entity_type, %key, instance, "Actor crashed"),
                Err(e) => warn!(entity_type, %key, instance, error = %e, "Actor task cancelled"),
            }
            if registry.deregister(&key, instance) {
                info!(entity_type, %key, instance, size = registry.entries.len(), "Deregistered");
            }
        });
    }

    /// The registered handle for `key`, if any. It may belong to an actor that has just
    /// terminated; use [`EntitySupervisor::exists`] to ask whether the actor is live.
    pub fn lookup(&self, key: &T::Key) -> Option<EntityHandle<T>> {
        self.registry
            .entries
            .get(key)
            .map(|entry| entry.value().clone())
    }

    pub fn exists(&self, key: &T::Key) -> bool {
        self.live_handle(key).is_some()
    }

    pub fn count(&self) -> usize {
        self.handles().len()
    }

    /// Live keys, ascending, without duplicates.
    pub fn list_keys(&self) -> Vec<T::Key> {
        self.handles()
            .into_iter()
            .map(|handle| handle.key().clone())
            .collect()
    }

    /// Point-in-time copy of every live handle, in key order.
    ///
    /// No registry lock is held once this returns, so callers may query each actor at
    /// their own pace. Actors may terminate after the copy is taken.
    pub fn handles(&self) -> Vec<EntityHandle<T>> {
        // Collect first: removing while iterating would deadlock on the shard lock.
        let (mut live, closed): (Vec<EntityHandle<T>>, Vec<EntityHandle<T>>) = self
            .registry
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .partition(|handle| !handle.is_closed());
        for handle in closed {
            self.evict(&handle);
        }
        live.sort_by(|a, b| a.key().cmp(b.key()));
        live
    }

    /// The handle for `key` if its actor still accepts requests. A closed handle is
    /// deregistered before returning `None`.
    fn live_handle(&self, key: &T::Key) -> Option<EntityHandle<T>> {
        let handle = self.lookup(key)?;
        if handle.is_closed() {
            self.evict(&handle);
            return None;
        }
        Some(handle)
    }

    fn evict(&self, handle: &EntityHandle<T>) {
        if self.registry.deregister(handle.key(), handle.instance()) {
            debug!(entity_type = entity_type::<T>(), key = %handle.key(), instance = handle.instance(), "Evicted closed actor");
        }
    }

    /// Snapshot of the entity for `key`.
    pub async fn get(&self, key: &T::Key) -> Result<T, FrameworkError> {
        let handle = self.require(key)?;
        handle.get().await.map_err(|e| gone_as_not_found(e, key))
    }

    /// Runs `action` on the actor for `key`.
    pub async fn perform_action(&self, key: &T::Key, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let handle = self.require(key)?;
        handle
            .perform_action(action)
            .await
            .map_err(|e| gone_as_not_found(e, key))
    }

    /// Stops the actor for `key` and removes its entry.
    pub async fn stop(&self, key: &T::Key) -> Result<(), FrameworkError> {
        let handle = self.require(key)?;
        handle.stop().await.map_err(|e| gone_as_not_found(e, key))?;
        if self.registry.deregister(key, handle.instance()) {
            info!(entity_type = entity_type::<T>(), %key, instance = handle.instance(), "Deregistered");
        }
        Ok(())
    }

    /// Refuses further creations, stops every live actor and waits for the registry to empty.
    ///
    /// Returns the number of actors that were stopped.
    pub async fn shutdown(&self) -> usize {
        let entity_type = entity_type::<T>();
        self.closed.store(true, Ordering::Release);
        info!(entity_type, size = self.count(), "Shutting down supervisor");

        // Repeat until empty: a find_or_create that passed the closed check just before
        // the flag flipped can still register one more actor.
        let mut stopped = 0;
        loop {
            let removed = self.registry.removed.notified();
            tokio::pin!(removed);
            removed.as_mut().enable();

            let remaining = self.handles();
            if remaining.is_empty() {
                break;
            }
            for handle in remaining {
                match self.stop(handle.key()).await {
                    Ok(()) => stopped += 1,
                    Err(e) => debug!(entity_type, key = %handle.key(), error = %e, "Already gone"),
                }
            }
            if self.registry.entries.is_empty() {
                break;
            }
            // Entries whose actor died without answering are left to their watchers.
            removed.await;
        }
        info!(entity_type, stopped, "Supervisor shutdown complete");
        stopped
    }

    fn require(&self, key: &T::Key) -> Result<EntityHandle<T>, FrameworkError> {
        self.live_handle(key)
            .ok_or_else(|| FrameworkError::NotFound(key.to_string()))
    }
}

fn gone_as_not_found<K: std::fmt::Display>(e: FrameworkError, key: &K) -> FrameworkError {
    if e.is_gone() {
        FrameworkError::NotFound(key.to_string())
    } else {
        e
    }
}
