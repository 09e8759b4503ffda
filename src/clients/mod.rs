//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod directory_client;
pub mod order_client;

pub use directory_client::*;
pub use order_client::*;
