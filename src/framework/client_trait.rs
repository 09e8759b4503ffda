//! # ActorClient Trait
//!
//! Common interface for resource-specific clients: a domain client only has to expose
//! its inner `ResourceClient` and gets an instrumented `send` for free.
use crate::framework::{ActorResource, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to share the request path.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone)]
/// pub struct OrderClient {
///     inner: ResourceClient<OrderLedger>,
/// }
///
/// impl ActorClient<OrderLedger> for OrderClient {
///     fn inner(&self) -> &ResourceClient<OrderLedger> {
///         &self.inner
///     }
/// }
///
/// // send() is provided automatically
/// let result = client.send(LedgerAction::ReturnToCourier(OrderId(1))).await?;
/// ```
#[async_trait]
pub trait ActorClient<T: ActorResource>: Send + Sync {
    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Send an action to the actor and wait for its answer.
    #[tracing::instrument(skip(self))]
    async fn send(&self, action: T::Action) -> Result<T::ActionResult, T::Error> {
        tracing::debug!("Sending request");
        self.inner().perform_action(action).await
    }
}
