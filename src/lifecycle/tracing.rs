//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); the actor loop tags
//! every line with `resource_type` instead.
//!
//! ## What Gets Traced
//!
//! - Actor lifecycle: start, shutdown and how many actions were handled
//! - Ledger transitions: accepted, given, refunded, returned, with order and client ids
//! - Failed actions at `warn`, with the error message
//! - Client calls as spans (`#[instrument]`), full payloads at `debug`
//!
//! ```bash
//! RUST_LOG=info parcel-custody cl-orders --cid 5
//! RUST_LOG=debug parcel-custody cl-give --cid 5 --oids 1,2
//! ```
//!
//! With `RUST_LOG=info` a give-out looks like:
//!
//! ```text
//! INFO Actor started resource_type="OrderLedger"
//! INFO give_to_client: Given to client client_id=client_5 count=2
//! INFO give_to_client: Action ok resource_type="OrderLedger" handled=1
//! ```
//!
//! Logs go to stderr so command output on stdout stays clean.

/// Installs the global subscriber. Call once, from the binary.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
