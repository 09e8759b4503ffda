//! Order ledger resource: the custody state machine behind its actor.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::OrderLedger;
pub use error::*;

use crate::clients::OrderClient;
use crate::framework::ResourceActor;

/// Refunded orders shown per `ListRefunds` page.
pub const REFUND_PAGE_SIZE: usize = 10;

/// A given order may be refunded strictly before this many hours have passed.
pub const REFUND_WINDOW_HOURS: i64 = 48;

/// Wraps an opened ledger in an actor and returns its client.
///
/// The actor still has to be spawned with `run(clock)`.
pub fn new(ledger: OrderLedger, buffer_size: usize) -> (ResourceActor<OrderLedger>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(ledger, buffer_size);
    (actor, OrderClient::new(generic_client))
}
