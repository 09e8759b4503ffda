//! # Parcel Custody
//!
//! Tracks parcels through a pick-up point: accepted from a courier, given to the
//! client, refunded by the client or returned to the courier. State lives in flat
//! JSON files and every transition is checked against time and ownership rules.
//!
//! ## Architecture Notes
//!
//! ### 1. One owner per resource
//! The [`OrderLedger`](ledger::OrderLedger) owns both order collections and runs
//! inside a [`ResourceActor`](framework::ResourceActor). Callers hold cloneable
//! [`OrderClient`](clients::OrderClient)s and every request waits its turn on the
//! actor's channel, so a load, validate, persist cycle never races another one.
//!
//! ### 2. Context injection
//! The ledger's clock is passed to `run()` rather than built into the ledger, so
//! tests drive time with a [`ManualClock`](clock::ManualClock).
//!
//! ### 3. Typed errors
//! Each resource has one `thiserror` enum ([`OrderError`](ledger::OrderError),
//! [`DirectoryError`](directory::DirectoryError)). Channel failures fold into it via
//! `From<FrameworkError>`.
//!
//! ## Module Tour
//!
//! - [`framework`]: generic actor, client and mock
//! - [`model`]: orders, packaging rules, pick-up points
//! - [`storage`]: JSON array files with atomic rewrite
//! - [`ledger`]: the order lifecycle state machine
//! - [`directory`]: pick-up point reader and writer workers
//! - [`session`]: the interactive `read`/`write` front end
//! - [`commands`]: one-shot order commands used by the binary
//! - [`lifecycle`]: startup, shutdown and tracing setup
//!
//! ```bash
//! RUST_LOG=info cargo run -- cr-take --oid 1 --cid 5 --at 48h --weight 8 --price 20 --packaging package
//! cargo test
//! ```

pub mod clients;
pub mod clock;
pub mod commands;
pub mod config;
pub mod directory;
pub mod framework;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod session;
pub mod storage;
