//! Represents one parcel in custody at the pick-up point.
//!
//! Orders are owned by the [`OrderLedger`](crate::ledger::OrderLedger); nothing else
//! reads or writes the files they are persisted in.

use crate::ledger::{OrderError, REFUND_WINDOW_HOURS};
use crate::model::Packaging;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Type-safe identifier for Clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl From<u64> for ClientId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub client_id: ClientId,
    /// Deadline by which the client must collect the order.
    pub expires_at: DateTime<Utc>,
    /// In kg
    pub weight: f64,
    /// Includes the packaging surcharge.
    pub price: f64,
    pub packaging: Packaging,
    pub is_given: bool,
    /// Set together with `is_given`.
    pub given_at: Option<DateTime<Utc>>,
}

/// Payload for accepting an order from a courier.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCreate {
    pub id: OrderId,
    pub client_id: ClientId,
    pub expires_at: DateTime<Utc>,
    pub weight: f64,
    /// Final price, surcharge already included.
    pub price: f64,
    pub packaging: Packaging,
}

impl OrderCreate {
    /// Builds the payload from a base price, applying the packaging rule.
    ///
    /// # Errors
    /// `WeightExceedsLimit` if the weight is above the packaging ceiling.
    pub fn priced(
        id: OrderId,
        client_id: ClientId,
        expires_at: DateTime<Utc>,
        weight: f64,
        base_price: f64,
        packaging: Packaging,
    ) -> Result<Self, OrderError> {
        let price = packaging.apply(weight, base_price)?;
        Ok(Self {
            id,
            client_id,
            expires_at,
            weight,
            price,
            packaging,
        })
    }
}

impl Order {
    /// Creates the record for a freshly accepted order (not given).
    pub fn accepted(params: OrderCreate) -> Self {
        Self {
            id: params.id,
            client_id: params.client_id,
            expires_at: params.expires_at,
            weight: params.weight,
            price: params.price,
            packaging: params.packaging,
            is_given: false,
            given_at: None,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn mark_given(&mut self, now: DateTime<Utc>) {
        self.is_given = true;
        self.given_at = Some(now);
    }

    /// True while the client may still bring the order back.
    pub fn within_refund_window(&self, now: DateTime<Utc>) -> bool {
        match (self.is_given, self.given_at) {
            (true, Some(given_at)) => now - given_at < Duration::hours(REFUND_WINDOW_HOURS),
            _ => false,
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} expires={} weight={}kg price={} packaging={}",
            self.id,
            self.client_id,
            self.expires_at.to_rfc3339(),
            self.weight,
            self.price,
            self.packaging
        )?;
        if let Some(given_at) = self.given_at {
            write!(f, " given={}", given_at.to_rfc3339())?;
        }
        Ok(())
    }
}
