//! Requests understood by the ledger actor and the answers it sends back.

use crate::ledger::OrderError;
use crate::model::{ClientId, Order, OrderCreate, OrderId};
use std::num::{NonZeroU64, NonZeroUsize};

/// How many orders a client listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Unbounded,
    AtMost(NonZeroUsize),
}

impl Limit {
    pub fn take(self, orders: impl Iterator<Item = Order>) -> Vec<Order> {
        match self {
            Limit::Unbounded => orders.collect(),
            Limit::AtMost(n) => orders.take(n.get()).collect(),
        }
    }
}

/// `-1` means unbounded; any other value must be positive.
impl TryFrom<i64> for Limit {
    type Error = OrderError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == -1 {
            return Ok(Limit::Unbounded);
        }
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Limit::AtMost)
            .ok_or(OrderError::InvalidLimit(value))
    }
}

#[derive(Debug)]
pub enum LedgerAction {
    AcceptFromCourier(OrderCreate),
    ReturnToCourier(OrderId),
    GiveToClient {
        client_id: ClientId,
        order_ids: Vec<OrderId>,
    },
    ListClientOrders {
        client_id: ClientId,
        limit: Limit,
        only_unclaimed_own: bool,
    },
    RefundFromClient {
        client_id: ClientId,
        order_id: OrderId,
    },
    ListRefunds {
        page: NonZeroU64,
    },
}

/// One variant per `LedgerAction`, in the same order.
#[derive(Debug)]
pub enum LedgerActionResult {
    Accepted(Order),
    Returned(Order),
    Given(Vec<Order>),
    ClientOrders(Vec<Order>),
    Refunded(Order),
    RefundPage(Vec<Order>),
}
