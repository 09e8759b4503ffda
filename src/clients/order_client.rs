use crate::framework::{ActorClient, ResourceClient};
use crate::ledger::{LedgerAction, LedgerActionResult, Limit, OrderError, OrderLedger};
use crate::model::{ClientId, Order, OrderCreate, OrderId};
use async_trait::async_trait;
use std::num::NonZeroU64;
use tracing::{debug, instrument};

/// Client for interacting with the order ledger actor.
///
/// Cloning is cheap; every clone feeds the same ledger queue.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<OrderLedger>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<OrderLedger>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(order_id = %params.id))]
    pub async fn accept_from_courier(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!(?params, "accept_from_courier called");
        match self.send(LedgerAction::AcceptFromCourier(params)).await? {
            LedgerActionResult::Accepted(order) => Ok(order),
            other => unreachable!("AcceptFromCourier answered with {other:?}"),
        }
    }

    #[instrument(skip(self))]
    pub async fn return_to_courier(&self, order_id: OrderId) -> Result<Order, OrderError> {
        match self.send(LedgerAction::ReturnToCourier(order_id)).await? {
            LedgerActionResult::Returned(order) => Ok(order),
            other => unreachable!("ReturnToCourier answered with {other:?}"),
        }
    }

    #[instrument(skip(self))]
    pub async fn give_to_client(
        &self,
        client_id: ClientId,
        order_ids: Vec<OrderId>,
    ) -> Result<Vec<Order>, OrderError> {
        let action = LedgerAction::GiveToClient {
            client_id,
            order_ids,
        };
        match self.send(action).await? {
            LedgerActionResult::Given(orders) => Ok(orders),
            other => unreachable!("GiveToClient answered with {other:?}"),
        }
    }

    /// `limit` is a positive count or `-1` for all; anything else is `InvalidLimit`
    /// and never reaches the actor.
    #[instrument(skip(self))]
    pub async fn list_client_orders(
        &self,
        client_id: ClientId,
        limit: i64,
        only_unclaimed_own: bool,
    ) -> Result<Vec<Order>, OrderError> {
        let action = LedgerAction::ListClientOrders {
            client_id,
            limit: Limit::try_from(limit)?,
            only_unclaimed_own,
        };
        match self.send(action).await? {
            LedgerActionResult::ClientOrders(orders) => Ok(orders),
            other => unreachable!("ListClientOrders answered with {other:?}"),
        }
    }

    #[instrument(skip(self))]
    pub async fn refund_from_client(
        &self,
        client_id: ClientId,
        order_id: OrderId,
    ) -> Result<Order, OrderError> {
        let action = LedgerAction::RefundFromClient {
            client_id,
            order_id,
        };
        match self.send(action).await? {
            LedgerActionResult::Refunded(order) => Ok(order),
            other => unreachable!("RefundFromClient answered with {other:?}"),
        }
    }

    /// Pages are 1-indexed.
    #[instrument(skip(self))]
    pub async fn list_refunds(&self, page: u64) -> Result<Vec<Order>, OrderError> {
        let page = NonZeroU64::new(page)
            .ok_or_else(|| OrderError::InvalidArgument("page number must be positive".to_string()))?;
        match self.send(LedgerAction::ListRefunds { page }).await? {
            LedgerActionResult::RefundPage(orders) => Ok(orders),
            other => unreachable!("ListRefunds answered with {other:?}"),
        }
    }
}

#[async_trait]
impl ActorClient<OrderLedger> for OrderClient {
    fn inner(&self) -> &ResourceClient<OrderLedger> {
        &self.inner
    }
}
