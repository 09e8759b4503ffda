//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns a resource and
//! processes requests against it one at a time.

use crate::framework::client::ResourceClient;
use crate::framework::message::ResourceRequest;
use crate::framework::resource::ActorResource;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that owns a resource.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the resource and the
/// receiver end of the channel.
///
/// **Concurrency Model**:
/// The actor processes its requests *sequentially* in a loop. A request is read,
/// handled to completion and answered before the next one is taken off the channel,
/// so a resource that does load–validate–persist cycles never sees two of them
/// interleave. No `Mutex` is needed around the resource; exclusive ownership by
/// the task is the lock.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies into `actor.run(context)`.
/// 3.  **Run**: Spawn the run loop in a background task.
///
/// ```rust,ignore
/// let (actor, client) = ResourceActor::new(ledger, 32);
/// let handle = tokio::spawn(actor.run(clock));
/// let order = client.perform_action(LedgerAction::AcceptFromCourier(params)).await?;
/// ```
///
/// The loop ends when every client has been dropped, after the requests already
/// queued have been answered.
pub struct ResourceActor<T: ActorResource> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    resource: T,
    handled: u64,
}

impl<T: ActorResource> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `resource` - The state this actor will own exclusively.
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(resource: T, buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            resource,
            handled: 0,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// # Context Injection
    /// The `context` argument is passed to every `handle_action` call.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "OrderLedger" instead of "parcel_custody::ledger::entity::OrderLedger")
        let resource_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(resource_type, "Actor started");

        while let Some(ResourceRequest { action, respond_to }) = self.receiver.recv().await {
            debug!(resource_type, ?action, "Action");
            let result = self.resource.handle_action(action, &context).await;
            self.handled += 1;
            match &result {
                Ok(_) => info!(resource_type, handled = self.handled, "Action ok"),
                Err(e) => warn!(resource_type, error = %e, "Action failed"),
            }
            if respond_to.send(result).is_err() {
                debug!(resource_type, "Caller went away before the response");
            }
        }

        info!(resource_type, handled = self.handled, "Shutdown");
    }
}
