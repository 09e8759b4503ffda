//! One-shot order commands: argument checks at the caller boundary, then a single
//! ledger call, then the lines to print.

use crate::clients::OrderClient;
use crate::clock::SharedClock;
use crate::ledger::OrderError;
use crate::model::{ClientId, Order, OrderCreate, OrderId, Packaging};
use chrono::Duration;
use clap::Subcommand;

pub const ACCEPTED: &str = "Courier's order accepted successfully!";
pub const RETURNED: &str = "The order was returned to the courier successfully!";
pub const GIVEN: &str = "Orders were given to the client successfully!";
pub const REFUNDED: &str = "Order refunded successfully!";
pub const EMPTY_LIST: &str = "List of orders is empty";

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum OrderCommand {
    /// Accept an order from the courier.
    #[command(name = "cr-take")]
    CourierTake {
        /// Order ID
        #[arg(long)]
        oid: i64,
        /// Client ID
        #[arg(long)]
        cid: i64,
        /// How long the order waits for the client (e.g. 48h, 1h30m)
        #[arg(long = "at")]
        available_time: String,
        /// Weight in kg
        #[arg(long)]
        weight: f64,
        /// Price before the packaging surcharge
        #[arg(long)]
        price: f64,
        /// package, carton or film
        #[arg(long)]
        packaging: String,
    },
    /// Return an expired, unclaimed (or refunded) order to the courier.
    #[command(name = "cr-return")]
    CourierReturn {
        #[arg(long)]
        oid: i64,
    },
    /// Give orders to their client (all or nothing).
    #[command(name = "cl-give")]
    ClientGive {
        #[arg(long)]
        cid: i64,
        /// Comma-separated order IDs (e.g. 1,3,7)
        #[arg(long)]
        oids: String,
    },
    /// List orders, newest first.
    #[command(name = "cl-orders")]
    ClientOrders {
        #[arg(long)]
        cid: i64,
        /// How many orders to show, -1 for all
        #[arg(short = 'n', default_value_t = -1, allow_negative_numbers = true)]
        n: i64,
        /// Only this client's orders that have not been given yet
        #[arg(long)]
        ouo: bool,
    },
    /// Accept a refund from the client within 48 hours of give-out.
    #[command(name = "cl-refund")]
    ClientRefund {
        #[arg(long)]
        cid: i64,
        #[arg(long)]
        oid: i64,
    },
    /// Show refunded orders, 10 per page.
    #[command(name = "refund-list")]
    RefundList {
        /// Page number starting with 1
        #[arg(short = 'p', default_value_t = 1)]
        page: i64,
    },
}

/// Runs [`OrderCommand`]s against the ledger.
#[derive(Clone)]
pub struct CommandRunner {
    orders: OrderClient,
    clock: SharedClock,
}

impl CommandRunner {
    pub fn new(orders: OrderClient, clock: SharedClock) -> Self {
        Self { orders, clock }
    }

    /// Executes one command and returns the lines to print on success.
    pub async fn execute(&self, command: OrderCommand) -> Result<Vec<String>, OrderError> {
        match command {
            OrderCommand::CourierTake {
                oid,
                cid,
                available_time,
                weight,
                price,
                packaging,
            } => {
                let order_id = order_id(oid)?;
                let client_id = client_id(cid)?;
                let available_time = parse_duration(&available_time)?;
                let packaging: Packaging = packaging.parse()?;
                let expires_at = self
                    .clock
                    .now()
                    .checked_add_signed(available_time)
                    .ok_or_else(|| invalid("available time is not given or incorrect"))?;
                let params =
                    OrderCreate::priced(order_id, client_id, expires_at, weight, price, packaging)?;
                self.orders.accept_from_courier(params).await?;
                Ok(vec![ACCEPTED.to_string()])
            }
            OrderCommand::CourierReturn { oid } => {
                self.orders.return_to_courier(order_id(oid)?).await?;
                Ok(vec![RETURNED.to_string()])
            }
            OrderCommand::ClientGive { cid, oids } => {
                let client_id = client_id(cid)?;
                let order_ids = parse_order_ids(&oids)?;
                self.orders.give_to_client(client_id, order_ids).await?;
                Ok(vec![GIVEN.to_string()])
            }
            OrderCommand::ClientOrders { cid, n, ouo } => {
                let orders = self.orders.list_client_orders(client_id(cid)?, n, ouo).await?;
                Ok(order_lines(&orders))
            }
            OrderCommand::ClientRefund { cid, oid } => {
                self.orders
                    .refund_from_client(client_id(cid)?, order_id(oid)?)
                    .await?;
                Ok(vec![REFUNDED.to_string()])
            }
            OrderCommand::RefundList { page } => {
                let page = u64::try_from(page)
                    .ok()
                    .filter(|p| *p > 0)
                    .ok_or_else(|| invalid("page number is incorrect"))?;
                let orders = self.orders.list_refunds(page).await?;
                if orders.is_empty() {
                    return Ok(vec![EMPTY_LIST.to_string()]);
                }
                let header = format!("\t\t\tPage number: {page}");
                let mut lines = vec![header.clone()];
                lines.extend(orders.iter().map(ToString::to_string));
                lines.push(header);
                Ok(lines)
            }
        }
    }
}

fn invalid(message: &str) -> OrderError {
    OrderError::InvalidArgument(message.to_string())
}

fn order_id(raw: i64) -> Result<OrderId, OrderError> {
    u64::try_from(raw)
        .ok()
        .filter(|id| *id > 0)
        .map(OrderId)
        .ok_or_else(|| invalid("order ID is not given or incorrect"))
}

fn client_id(raw: i64) -> Result<ClientId, OrderError> {
    u64::try_from(raw)
        .ok()
        .filter(|id| *id > 0)
        .map(ClientId)
        .ok_or_else(|| invalid("client ID is not given or incorrect"))
}

fn order_lines(orders: &[Order]) -> Vec<String> {
    if orders.is_empty() {
        return vec![EMPTY_LIST.to_string()];
    }
    orders.iter().map(ToString::to_string).collect()
}

/// Parses `1,3,7` into order ids. Empty input and non-numeric entries are rejected.
pub fn parse_order_ids(raw: &str) -> Result<Vec<OrderId>, OrderError> {
    if raw.trim().is_empty() {
        return Err(invalid("orders ID are not given"));
    }
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| invalid(&format!("order ID {:?} is not an integer", part.trim())))
                .and_then(order_id)
        })
        .collect()
}

/// Parses durations such as `48h`, `90m`, `1h30m` or `45s`. The result must be positive.
pub fn parse_duration(raw: &str) -> Result<Duration, OrderError> {
    let incorrect = || invalid("available time is not given or incorrect");
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(incorrect());
    }

    let mut total = Duration::zero();
    let mut digits = String::new();
    for c in raw.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let amount: i64 = digits.parse().map_err(|_| incorrect())?;
        digits.clear();
        let part = match c {
            'h' => Duration::try_hours(amount),
            'm' => Duration::try_minutes(amount),
            's' => Duration::try_seconds(amount),
            _ => None,
        }
        .ok_or_else(incorrect)?;
        total = total.checked_add(&part).ok_or_else(incorrect)?;
    }
    if !digits.is_empty() || total <= Duration::zero() {
        return Err(incorrect());
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::framework::mock::MockClient;
    use crate::ledger::{LedgerActionResult, OrderLedger};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn runner(mock: &MockClient<OrderLedger>) -> CommandRunner {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        CommandRunner::new(OrderClient::new(mock.client()), Arc::new(clock))
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("48h").unwrap(), Duration::hours(48));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("45s").unwrap(), Duration::seconds(45));
        for bad in ["", "0h", "h", "10", "3d", "-1h"] {
            assert!(parse_duration(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn order_id_lists() {
        assert_eq!(
            parse_order_ids("1, 3,7").unwrap(),
            vec![OrderId(1), OrderId(3), OrderId(7)]
        );
        assert!(matches!(parse_order_ids(""), Err(OrderError::InvalidArgument(_))));
        assert!(matches!(parse_order_ids("1,x"), Err(OrderError::InvalidArgument(_))));
        assert!(matches!(parse_order_ids("1,0"), Err(OrderError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn take_prices_and_dates_the_order() {
        let mut mock = MockClient::<OrderLedger>::new();
        let runner = runner(&mock);
        mock.expect_action().return_ok(LedgerActionResult::Accepted(Order::accepted(
            OrderCreate {
                id: OrderId(1),
                client_id: ClientId(5),
                expires_at: Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap(),
                weight: 8.0,
                price: 25.0,
                packaging: Packaging::Package,
            },
        )));

        let lines = runner
            .execute(OrderCommand::CourierTake {
                oid: 1,
                cid: 5,
                available_time: "48h".to_string(),
                weight: 8.0,
                price: 20.0,
                packaging: "package".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(lines, vec![ACCEPTED]);
        let received = mock.received();
        assert_eq!(received.len(), 1);
        assert!(received[0].contains("price: 25.0"), "{}", received[0]);
        assert!(received[0].contains("2024-05-03T12:00:00Z"), "{}", received[0]);
        mock.verify();
    }

    #[tokio::test]
    async fn boundary_checks_stop_before_the_ledger() {
        let mock = MockClient::<OrderLedger>::new();
        let runner = runner(&mock);

        let overweight = runner
            .execute(OrderCommand::CourierTake {
                oid: 1,
                cid: 5,
                available_time: "1h".to_string(),
                weight: 11.0,
                price: 20.0,
                packaging: "package".to_string(),
            })
            .await;
        assert!(matches!(overweight, Err(OrderError::WeightExceedsLimit { .. })));

        let bad_client = runner.execute(OrderCommand::CourierReturn { oid: 0 }).await;
        assert!(matches!(bad_client, Err(OrderError::InvalidArgument(_))));

        let bad_limit = runner
            .execute(OrderCommand::ClientOrders {
                cid: 1,
                n: -5,
                ouo: false,
            })
            .await;
        assert!(matches!(bad_limit, Err(OrderError::InvalidLimit(-5))));

        assert!(mock.received().is_empty());
    }

    #[tokio::test]
    async fn expiry_past_the_calendar_is_rejected() {
        let mock = MockClient::<OrderLedger>::new();
        let runner = runner(&mock);

        // Parses as a duration, but lands beyond the last representable date.
        let result = runner
            .execute(OrderCommand::CourierTake {
                oid: 1,
                cid: 5,
                available_time: "9999999999h".to_string(),
                weight: 1.0,
                price: 10.0,
                packaging: "film".to_string(),
            })
            .await;
        assert!(matches!(result, Err(OrderError::InvalidArgument(_))));
        assert!(mock.received().is_empty());
    }

    #[tokio::test]
    async fn pages_beyond_u32_reach_the_ledger() {
        let mut mock = MockClient::<OrderLedger>::new();
        let runner = runner(&mock);
        mock.expect_action().return_err(OrderError::PageOutOfRange {
            page: 5_000_000_000,
            total: 0,
        });

        let result = runner
            .execute(OrderCommand::RefundList {
                page: 5_000_000_000,
            })
            .await;
        assert!(matches!(
            result,
            Err(OrderError::PageOutOfRange {
                page: 5_000_000_000,
                ..
            })
        ));
        assert!(mock.received()[0].contains("5000000000"));

        let negative = runner.execute(OrderCommand::RefundList { page: -3 }).await;
        assert!(matches!(negative, Err(OrderError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn empty_listing_prints_placeholder() {
        let mut mock = MockClient::<OrderLedger>::new();
        let runner = runner(&mock);
        mock.expect_action()
            .return_ok(LedgerActionResult::ClientOrders(Vec::new()));

        let lines = runner
            .execute(OrderCommand::ClientOrders {
                cid: 1,
                n: -1,
                ouo: true,
            })
            .await
            .unwrap();
        assert_eq!(lines, vec![EMPTY_LIST]);
    }
}
