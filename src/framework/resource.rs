//! # ActorResource Trait
//!
//! The `ActorResource` trait is the contract a resource must satisfy to be owned by a
//! [`ResourceActor`](crate::framework::ResourceActor). A resource is whatever state a single
//! task should have exclusive access to: a pair of order collections, a directory file, and so on.
//!
//! # Architecture Note
//! The actor loop is written *once* against this trait. Each resource only describes:
//! - the actions it understands ([`ActorResource::Action`]),
//! - what a successful action returns ([`ActorResource::ActionResult`]),
//! - what it needs injected at run time ([`ActorResource::Context`]),
//! - how it fails ([`ActorResource::Error`]).
//!
//! Actions and results are enums whose variants match 1:1, so a client can unwrap the
//! result variant that corresponds to the action it sent.

use crate::framework::error::FrameworkError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Trait that any resource must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// `handle_action` is async so a resource can await file I/O or other actors.
/// The `Context` is passed to every call rather than stored at construction,
/// which lets callers bind dependencies (a clock, other clients) when the actor
/// starts running.
#[async_trait]
pub trait ActorResource: Send + 'static {
    /// Enum of the operations this resource understands.
    type Action: Send + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this resource.
    ///
    /// One error enum per resource rather than one per action. The
    /// `From<FrameworkError>` bound lets clients fold channel failures into the
    /// same type the resource already reports.
    type Error: std::error::Error + From<FrameworkError> + Send + Sync + 'static;

    /// Handle a single action. The actor never calls this concurrently.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
