//! # Generic Messages
//!
//! The request type sent from a `ResourceClient` to its `ResourceActor`.

use crate::framework::resource::ActorResource;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<
    Result<<T as ActorResource>::ActionResult, <T as ActorResource>::Error>,
>;

/// Internal message sent to the actor.
///
/// Every request carries its own responder, so the actor answers exactly once
/// per request and the caller blocks only on its own answer.
#[derive(Debug)]
pub struct ResourceRequest<T: ActorResource> {
    pub action: T::Action,
    pub respond_to: Response<T>,
}
