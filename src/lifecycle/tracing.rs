//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); the `entity_type` and
//! `key` fields identify where a line came from.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: started, populated, idle timeout, stop, shutdown
//! - **Registry**: created, lost registration race, deregistered, crashes
//! - **Requests**: Get and Action at debug level, action failures at warn
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle only
//! RUST_LOG=debug cargo run     # every request and timer reset
//! ```
//!
//! With `RUST_LOG=info`, the demo prints something like:
//!
//! ```text
//! INFO Created entity_type="Account" key=account_2 instance=1 size=1
//! INFO Actor started entity_type="Account" key=account_2
//! INFO Action ok entity_type="Account" key=account_10
//! INFO Stop requested entity_type="Account" key=account_2
//! INFO Deregistered entity_type="Account" key=account_2 instance=1 size=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
