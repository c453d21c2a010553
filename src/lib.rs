#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Account Registry
//!
//! > **One actor per key, created on demand, gone when idle.**
//!
//! This crate hosts a dynamic set of stateful workers on Tokio. Each account gets its own
//! actor that owns the account's state and processes requests one at a time. A supervisor
//! maps account ids to those actors, creates them on first use, and forgets them when they
//! terminate.
//!
//! ## 🏗️ Design Philosophy
//!
//! - **Single writer per key**: all access to an account goes through its actor's mailbox,
//!   so `increment` needs no lock and never loses an update.
//! - **At most one actor per key**: registration is an atomic check-and-insert on the
//!   registry. Concurrent `find_or_create` calls for one id all end up at the same actor.
//! - **Idle expiry**: an actor terminates itself once no order has been placed for the
//!   idle timeout (24 hours by default). Every order restarts the clock.
//! - **Let it fail and recreate**: a crashed or expired actor is deregistered; the next
//!   `find_or_create` starts a fresh one. Nothing is restarted automatically.
//!
//! ### Concurrency Model
//! Each `EntityActor` runs in its own Tokio task. Requests for different accounts proceed
//! in parallel. The registry is a sharded concurrent map and is only locked for the
//! duration of a single insert, lookup or removal.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic over the [`KeyedEntity`](framework::KeyedEntity) trait.
//! - **Key items**: [`EntityActor`](framework::EntityActor),
//!   [`EntitySupervisor`](framework::EntitySupervisor), [`RegistryConfig`](framework::RegistryConfig).
//!
//! ### 2. The Implementation ([`account_actor`], [`model`])
//! [`Account`](model::Account) implements `KeyedEntity`: population from the data source,
//! `GetOrderCount` and `Increment` actions.
//!
//! ### 3. The Collaborator ([`source`])
//! [`AccountSource`](source::AccountSource) is what an actor calls when it starts.
//! [`MockSource`](source::mock::MockSource) scripts it for tests.
//!
//! ### 4. The Interface ([`clients`])
//! [`AccountClient`](clients::AccountClient) is the caller-facing API.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`AccountSystem`](lifecycle::AccountSystem) wires everything together.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod account_actor;
pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod source;
