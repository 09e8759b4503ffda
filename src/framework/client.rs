//! # Generic Client
//!
//! This module defines the generic client for communicating with actors.

use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use crate::framework::resource::ActorResource;
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// The `ResourceClient<T>` forwards actions to a `ResourceActor<T>` over a Tokio mpsc
/// channel and waits for the answer on a oneshot channel.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Ordered** – every clone feeds the same queue, so all callers are serialized
///   behind one another.
pub struct ResourceClient<T: ActorResource> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorResource> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorResource> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn perform_action(&self, action: T::Action) -> Result<T::ActionResult, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest { action, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
