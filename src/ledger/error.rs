//! Error types for the order ledger.

use crate::framework::FrameworkError;
use crate::model::{ClientId, OrderId, Packaging};
use crate::storage::StorageError;
use std::fmt::Display;
use thiserror::Error;

/// Why a single order in a give-out batch cannot be handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveRejection {
    AlreadyGiven,
    Expired,
    WrongClient,
}

impl Display for GiveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            GiveRejection::AlreadyGiven => "it has already been given",
            GiveRejection::Expired => "its storage period has expired",
            GiveRejection::WrongClient => "it belongs to another client",
        };
        f.write_str(reason)
    }
}

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order {0} has already expired")]
    ExpiredOnArrival(OrderId),

    #[error("order {0} already exists")]
    DuplicateOrder(OrderId),

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// Only expired, never-given orders go back to the courier.
    #[error("order {0} cannot be returned to the courier yet")]
    NotYetReturnable(OrderId),

    #[error("order {order_id} cannot be given: {reason}")]
    GiveOrderRejected {
        order_id: OrderId,
        reason: GiveRejection,
    },

    #[error("orders not found: {}", join_ids(missing))]
    IncompleteOrderSet { missing: Vec<OrderId> },

    #[error("order {order_id} does not belong to {client_id}")]
    WrongClient {
        order_id: OrderId,
        client_id: ClientId,
    },

    #[error("order {0} cannot be refunded: not given or refund period is over")]
    RefundWindowExpired(OrderId),

    #[error("page {page} is out of range: {total} refunded orders")]
    PageOutOfRange { page: u64, total: usize },

    #[error("unknown packaging type: {0}")]
    UnknownPackaging(String),

    #[error("weight {weight}kg exceeds {max_weight}kg allowed for {packaging}")]
    WeightExceedsLimit {
        packaging: Packaging,
        weight: f64,
        max_weight: f64,
    },

    #[error("limit must be positive or -1, got {0}")]
    InvalidLimit(i64),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StorageError),

    #[error("actor communication error: {0}")]
    ActorCommunication(#[from] FrameworkError),
}

fn join_ids(ids: &[OrderId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
