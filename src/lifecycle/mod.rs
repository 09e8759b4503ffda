//! Startup, wiring and shutdown of the running system.

pub mod custody_system;
pub mod tracing;

pub use custody_system::*;
pub use self::tracing::setup_tracing;
