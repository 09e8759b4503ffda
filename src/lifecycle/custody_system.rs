use crate::clients::OrderClient;
use crate::clock::{SharedClock, SystemClock};
use crate::config::Config;
use crate::directory::{DirectoryError, PickUpPointStore};
use crate::ledger::{self, OrderError, OrderLedger};
use crate::session::Session;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Faults that prevent the system from starting or stopping cleanly.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("cannot open order collections: {0}")]
    Ledger(#[from] OrderError),

    #[error("cannot open pick-up point directory: {0}")]
    Directory(#[from] DirectoryError),

    #[error("actor task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Owns the running ledger actor and the pick-up point store.
///
/// # Example
///
/// ```ignore
/// let system = CustodySystem::start(Config::in_dir("data")).await?;
/// system.order_client.return_to_courier(OrderId(3)).await?;
/// system.shutdown().await?;
/// ```
pub struct CustodySystem {
    /// Client for the order ledger actor. Clone it freely.
    pub order_client: OrderClient,

    /// Clock the ledger reads "now" from.
    pub clock: SharedClock,

    directory: Arc<PickUpPointStore>,
    channel_buffer: usize,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CustodySystem {
    pub async fn start(config: Config) -> Result<Self, SystemError> {
        Self::start_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Opens every collection (creating missing files), reconciles the order
    /// collections and spawns the ledger actor bound to `clock`.
    pub async fn start_with_clock(config: Config, clock: SharedClock) -> Result<Self, SystemError> {
        let ledger = OrderLedger::open(
            config.available_orders_path(),
            config.refunded_orders_path(),
        )
        .await?;
        let directory = Arc::new(PickUpPointStore::open(config.pick_up_points_path()).await?);

        let (ledger_actor, order_client) = ledger::new(ledger, config.channel_buffer);
        let ledger_handle = tokio::spawn(ledger_actor.run(clock.clone()));

        info!(data_dir = %config.data_dir.display(), "Custody system started");
        Ok(Self {
            order_client,
            clock,
            directory,
            channel_buffer: config.channel_buffer,
            handles: vec![ledger_handle],
        })
    }

    /// Starts an interactive session over the pick-up point directory.
    pub fn session(&self) -> Session {
        Session::start(self.directory.clone(), self.channel_buffer)
    }

    /// Drops the ledger client and waits for the actor to drain its queue.
    ///
    /// Clones of `order_client` handed out earlier keep the actor alive; drop
    /// them first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        drop(self.order_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
