//! The order ledger: sole owner of the "available" and "refunded" collections.
//!
//! Every operation is a full load, validate, mutate, persist cycle against the
//! collection files. The ledger itself holds no cached state, so the files are
//! always the source of truth. Inside one process it runs in a single actor
//! task; across processes each cycle holds the file locks of both collections.

use crate::clock::SharedClock;
use crate::framework::ActorResource;
use crate::ledger::{
    GiveRejection, LedgerAction, LedgerActionResult, Limit, OrderError, REFUND_PAGE_SIZE,
};
use crate::model::{ClientId, Order, OrderCreate, OrderId};
use crate::storage::{CollectionLock, JsonCollection};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};
use std::num::NonZeroU64;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct OrderLedger {
    available: JsonCollection<Order>,
    refunded: JsonCollection<Order>,
}

impl OrderLedger {
    /// Opens both collections, creating empty files where needed, and reconciles them.
    ///
    /// An order found in both collections is a refund whose second write never
    /// landed; it is kept as refunded and dropped from "available".
    pub async fn open(
        available_path: impl Into<PathBuf>,
        refunded_path: impl Into<PathBuf>,
    ) -> Result<Self, OrderError> {
        let ledger = Self {
            available: JsonCollection::open(available_path).await?,
            refunded: JsonCollection::open(refunded_path).await?,
        };
        {
            let _locks = ledger.lock().await?;
            ledger.reconcile().await?;
        }
        Ok(ledger)
    }

    /// Exclusive locks on both collections, always taken "available" first.
    async fn lock(&self) -> Result<(CollectionLock, CollectionLock), OrderError> {
        let available = self.available.lock().await?;
        let refunded = self.refunded.lock().await?;
        Ok((available, refunded))
    }

    async fn reconcile(&self) -> Result<usize, OrderError> {
        let refunded: HashSet<OrderId> = self
            .refunded
            .load()
            .await?
            .into_iter()
            .map(|order| order.id)
            .collect();
        if refunded.is_empty() {
            return Ok(0);
        }

        let mut available = self.available.load().await?;
        let before = available.len();
        available.retain(|order| !refunded.contains(&order.id));
        let removed = before - available.len();
        if removed > 0 {
            warn!(removed, "Dropping refunded orders left in available");
            self.available.save(&available).await?;
        }
        Ok(removed)
    }

    async fn accept_from_courier(
        &mut self,
        params: OrderCreate,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        if params.expires_at <= now {
            return Err(OrderError::ExpiredOnArrival(params.id));
        }

        let mut available = self.available.load().await?;
        if available.iter().any(|order| order.id == params.id) {
            return Err(OrderError::DuplicateOrder(params.id));
        }
        // Refunded orders keep their id until returned to the courier.
        if self.refunded.load().await?.iter().any(|order| order.id == params.id) {
            return Err(OrderError::DuplicateOrder(params.id));
        }

        let order = Order::accepted(params);
        available.push(order.clone());
        self.available.save(&available).await?;
        info!(order_id = %order.id, client_id = %order.client_id, "Accepted");
        Ok(order)
    }

    async fn return_to_courier(
        &mut self,
        order_id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let mut available = self.available.load().await?;
        if let Some(index) = available.iter().position(|order| order.id == order_id) {
            let order = &available[index];
            if order.is_given || !order.is_expired_at(now) {
                return Err(OrderError::NotYetReturnable(order_id));
            }
            let order = available.remove(index);
            self.available.save(&available).await?;
            info!(%order_id, "Returned to courier");
            return Ok(order);
        }

        let mut refunded = self.refunded.load().await?;
        if let Some(index) = refunded.iter().position(|order| order.id == order_id) {
            let order = refunded.remove(index);
            self.refunded.save(&refunded).await?;
            info!(%order_id, "Returned refunded order to courier");
            return Ok(order);
        }

        Err(OrderError::OrderNotFound(order_id))
    }

    async fn give_to_client(
        &mut self,
        client_id: ClientId,
        order_ids: Vec<OrderId>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderError> {
        if order_ids.is_empty() {
            return Err(OrderError::InvalidArgument(
                "order id list is empty".to_string(),
            ));
        }
        let mut requested = BTreeSet::new();
        for order_id in order_ids {
            if !requested.insert(order_id) {
                return Err(OrderError::InvalidArgument(format!(
                    "{order_id} is listed more than once"
                )));
            }
        }

        let mut available = self.available.load().await?;
        let mut found = BTreeSet::new();
        for order in available.iter().filter(|o| requested.contains(&o.id)) {
            let rejection = if order.is_given {
                Some(GiveRejection::AlreadyGiven)
            } else if order.is_expired_at(now) {
                Some(GiveRejection::Expired)
            } else if order.client_id != client_id {
                Some(GiveRejection::WrongClient)
            } else {
                None
            };
            if let Some(reason) = rejection {
                return Err(OrderError::GiveOrderRejected {
                    order_id: order.id,
                    reason,
                });
            }
            found.insert(order.id);
        }

        let missing: Vec<OrderId> = requested.difference(&found).copied().collect();
        if !missing.is_empty() {
            return Err(OrderError::IncompleteOrderSet { missing });
        }

        let mut given = Vec::with_capacity(requested.len());
        for order in available.iter_mut().filter(|o| requested.contains(&o.id)) {
            order.mark_given(now);
            given.push(order.clone());
        }
        self.available.save(&available).await?;
        info!(%client_id, count = given.len(), "Given to client");
        Ok(given)
    }

    async fn list_client_orders(
        &self,
        client_id: ClientId,
        limit: Limit,
        only_unclaimed_own: bool,
    ) -> Result<Vec<Order>, OrderError> {
        let available = self.available.load().await?;
        let matching = available
            .into_iter()
            .rev()
            .filter(|order| !only_unclaimed_own || (order.client_id == client_id && !order.is_given));
        Ok(limit.take(matching))
    }

    async fn refund_from_client(
        &mut self,
        client_id: ClientId,
        order_id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let mut available = self.available.load().await?;
        let index = available
            .iter()
            .position(|order| order.id == order_id)
            .ok_or(OrderError::OrderNotFound(order_id))?;
        let order = &available[index];
        if order.client_id != client_id {
            return Err(OrderError::WrongClient {
                order_id,
                client_id,
            });
        }
        if !order.within_refund_window(now) {
            return Err(OrderError::RefundWindowExpired(order_id));
        }

        let order = available.remove(index);
        let mut refunded = self.refunded.load().await?;
        refunded.push(order.clone());

        // "refunded" first: a crash in between leaves the order in both files,
        // which `reconcile` resolves on the next start.
        self.refunded.save(&refunded).await?;
        if let Err(e) = self.available.save(&available).await {
            refunded.pop();
            if let Err(rollback) = self.refunded.save(&refunded).await {
                error!(%order_id, error = %rollback, "Refund rollback failed");
            }
            return Err(e.into());
        }

        info!(%order_id, %client_id, "Refunded");
        Ok(order)
    }

    async fn list_refunds(&self, page: NonZeroU64) -> Result<Vec<Order>, OrderError> {
        let refunded = self.refunded.load().await?;
        let start = usize::try_from(page.get() - 1)
            .ok()
            .and_then(|skipped| skipped.checked_mul(REFUND_PAGE_SIZE))
            .filter(|start| *start < refunded.len());
        let Some(start) = start else {
            return Err(OrderError::PageOutOfRange {
                page: page.get(),
                total: refunded.len(),
            });
        };
        let end = (start + REFUND_PAGE_SIZE).min(refunded.len());
        Ok(refunded[start..end].to_vec())
    }
}

#[async_trait]
impl ActorResource for OrderLedger {
    type Action = LedgerAction;
    type ActionResult = LedgerActionResult;
    type Context = SharedClock;
    type Error = OrderError;

    async fn handle_action(
        &mut self,
        action: LedgerAction,
        clock: &SharedClock,
    ) -> Result<LedgerActionResult, OrderError> {
        let _locks = self.lock().await?;
        let now = clock.now();
        match action {
            LedgerAction::AcceptFromCourier(params) => self
                .accept_from_courier(params, now)
                .await
                .map(LedgerActionResult::Accepted),
            LedgerAction::ReturnToCourier(order_id) => self
                .return_to_courier(order_id, now)
                .await
                .map(LedgerActionResult::Returned),
            LedgerAction::GiveToClient {
                client_id,
                order_ids,
            } => self
                .give_to_client(client_id, order_ids, now)
                .await
                .map(LedgerActionResult::Given),
            LedgerAction::ListClientOrders {
                client_id,
                limit,
                only_unclaimed_own,
            } => self
                .list_client_orders(client_id, limit, only_unclaimed_own)
                .await
                .map(LedgerActionResult::ClientOrders),
            LedgerAction::RefundFromClient {
                client_id,
                order_id,
            } => self
                .refund_from_client(client_id, order_id, now)
                .await
                .map(LedgerActionResult::Refunded),
            LedgerAction::ListRefunds { page } => self
                .list_refunds(page)
                .await
                .map(LedgerActionResult::RefundPage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Packaging;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn create(id: u64, client: u64) -> OrderCreate {
        OrderCreate {
            id: OrderId(id),
            client_id: ClientId(client),
            expires_at: t0() + Duration::hours(24),
            weight: 1.0,
            price: 10.0,
            packaging: Packaging::Film,
        }
    }

    async fn ledger(dir: &tempfile::TempDir) -> OrderLedger {
        OrderLedger::open(
            dir.path().join("available_orders.json"),
            dir.path().join("refunded_orders.json"),
        )
        .await
        .expect("open ledger")
    }

    #[tokio::test]
    async fn give_reports_first_violation_in_storage_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();
        ledger.accept_from_courier(create(2, 6), t0()).await.unwrap();
        ledger.accept_from_courier(create(3, 5), t0()).await.unwrap();
        ledger
            .give_to_client(ClientId(5), vec![OrderId(3)], t0())
            .await
            .unwrap();

        let err = ledger
            .give_to_client(ClientId(5), vec![OrderId(3), OrderId(2)], t0())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::GiveOrderRejected {
                order_id: OrderId(2),
                reason: GiveRejection::WrongClient
            }
        ));
    }

    #[tokio::test]
    async fn give_lists_every_missing_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();

        let err = ledger
            .give_to_client(ClientId(5), vec![OrderId(9), OrderId(1), OrderId(4)], t0())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::IncompleteOrderSet { missing } if missing == vec![OrderId(4), OrderId(9)]
        ));
        let stored = ledger
            .list_client_orders(ClientId(5), Limit::Unbounded, true)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1, "nothing was given");
    }

    #[tokio::test]
    async fn give_rejects_expired_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();

        let late = t0() + Duration::hours(25);
        assert!(matches!(
            ledger.give_to_client(ClientId(5), vec![OrderId(1)], late).await,
            Err(OrderError::GiveOrderRejected {
                reason: GiveRejection::Expired,
                ..
            })
        ));
        assert!(matches!(
            ledger.give_to_client(ClientId(5), Vec::new(), t0()).await,
            Err(OrderError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn return_requires_expired_and_ungiven() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();
        ledger.accept_from_courier(create(2, 5), t0()).await.unwrap();
        ledger
            .give_to_client(ClientId(5), vec![OrderId(2)], t0())
            .await
            .unwrap();

        assert!(matches!(
            ledger.return_to_courier(OrderId(1), t0()).await,
            Err(OrderError::NotYetReturnable(OrderId(1)))
        ));
        let late = t0() + Duration::hours(25);
        assert!(matches!(
            ledger.return_to_courier(OrderId(2), late).await,
            Err(OrderError::NotYetReturnable(OrderId(2)))
        ));
        let returned = ledger.return_to_courier(OrderId(1), late).await.unwrap();
        assert_eq!(returned.id, OrderId(1));
        assert!(matches!(
            ledger.return_to_courier(OrderId(1), late).await,
            Err(OrderError::OrderNotFound(OrderId(1)))
        ));
    }

    #[tokio::test]
    async fn refunded_id_stays_taken_until_returned() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();
        ledger
            .give_to_client(ClientId(5), vec![OrderId(1)], t0())
            .await
            .unwrap();
        ledger
            .refund_from_client(ClientId(5), OrderId(1), t0() + Duration::hours(1))
            .await
            .unwrap();

        assert!(matches!(
            ledger.accept_from_courier(create(1, 5), t0()).await,
            Err(OrderError::DuplicateOrder(OrderId(1)))
        ));
        ledger.return_to_courier(OrderId(1), t0()).await.unwrap();
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();
    }

    #[tokio::test]
    async fn refund_checks_owner_before_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();

        assert!(matches!(
            ledger.refund_from_client(ClientId(6), OrderId(1), t0()).await,
            Err(OrderError::WrongClient { .. })
        ));
        assert!(matches!(
            ledger.refund_from_client(ClientId(5), OrderId(1), t0()).await,
            Err(OrderError::RefundWindowExpired(OrderId(1)))
        ));
        assert!(matches!(
            ledger.refund_from_client(ClientId(5), OrderId(2), t0()).await,
            Err(OrderError::OrderNotFound(OrderId(2)))
        ));
    }

    #[tokio::test]
    async fn open_drops_orders_present_in_both_collections() {
        let dir = tempfile::tempdir().unwrap();
        let mut order = Order::accepted(create(7, 5));
        order.mark_given(t0());
        let other = Order::accepted(create(8, 5));
        std::fs::write(
            dir.path().join("available_orders.json"),
            serde_json::to_vec(&vec![order.clone(), other.clone()]).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("refunded_orders.json"),
            serde_json::to_vec(&vec![order.clone()]).unwrap(),
        )
        .unwrap();

        let ledger = ledger(&dir).await;
        let available = ledger
            .list_client_orders(ClientId(0), Limit::Unbounded, false)
            .await
            .unwrap();
        assert_eq!(available, vec![other]);
        let refunds = ledger.list_refunds(NonZeroU64::MIN).await.unwrap();
        assert_eq!(refunds, vec![order]);
    }

    #[tokio::test]
    async fn failed_refund_leaves_order_available() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();
        ledger
            .give_to_client(ClientId(5), vec![OrderId(1)], t0())
            .await
            .unwrap();

        ledger.available.set_fail_saves(true);
        let err = ledger
            .refund_from_client(ClientId(5), OrderId(1), t0())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Persistence(_)));

        ledger.available.set_fail_saves(false);
        assert!(ledger.refunded.load().await.unwrap().is_empty());
        let available = ledger.available.load().await.unwrap();
        assert_eq!(available.len(), 1);
        assert!(available[0].is_given);
    }

    #[tokio::test]
    async fn given_order_cannot_be_given_again() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();
        ledger.accept_from_courier(create(2, 5), t0()).await.unwrap();
        ledger
            .give_to_client(ClientId(5), vec![OrderId(1)], t0())
            .await
            .unwrap();

        let later = t0() + Duration::hours(1);
        assert!(matches!(
            ledger.give_to_client(ClientId(5), vec![OrderId(1)], later).await,
            Err(OrderError::GiveOrderRejected {
                order_id: OrderId(1),
                reason: GiveRejection::AlreadyGiven
            })
        ));
        assert!(matches!(
            ledger
                .give_to_client(ClientId(5), vec![OrderId(2), OrderId(1)], later)
                .await,
            Err(OrderError::GiveOrderRejected {
                order_id: OrderId(1),
                reason: GiveRejection::AlreadyGiven
            })
        ));

        let stored = ledger.available.load().await.unwrap();
        assert_eq!(stored[0].given_at, Some(t0()));
        assert!(!stored[1].is_given);
        assert_eq!(stored[1].given_at, None);
    }

    #[tokio::test]
    async fn give_rejects_repeated_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();

        assert!(matches!(
            ledger
                .give_to_client(ClientId(5), vec![OrderId(1), OrderId(1)], t0())
                .await,
            Err(OrderError::InvalidArgument(message)) if message.contains("order_1")
        ));
        assert!(!ledger.available.load().await.unwrap()[0].is_given);
    }

    #[tokio::test]
    async fn huge_page_is_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir).await;
        ledger.accept_from_courier(create(1, 5), t0()).await.unwrap();
        ledger
            .give_to_client(ClientId(5), vec![OrderId(1)], t0())
            .await
            .unwrap();
        ledger
            .refund_from_client(ClientId(5), OrderId(1), t0())
            .await
            .unwrap();

        assert!(matches!(
            ledger.list_refunds(NonZeroU64::MAX).await,
            Err(OrderError::PageOutOfRange { page: u64::MAX, total: 1 })
        ));
    }

    #[tokio::test]
    async fn empty_refund_list_has_no_first_page() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir).await;
        assert!(matches!(
            ledger.list_refunds(NonZeroU64::MIN).await,
            Err(OrderError::PageOutOfRange { page: 1, total: 0 })
        ));
    }
}
