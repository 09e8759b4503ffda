//! Generic single-owner actor framework.
//!
//! A resource (anything implementing [`ActorResource`]) is moved into a
//! [`ResourceActor`] that runs in its own Tokio task. Callers hold cheap, cloneable
//! [`ResourceClient`]s and reach the resource only through its request channel, so
//! all access to the resource is serialized through one task.
//!
//! # Main Components
//!
//! - [`ActorResource`] - Trait a resource implements to be owned by an actor
//! - [`ResourceActor`] - Generic actor loop that owns the resource
//! - [`ResourceClient`] - Typed handle used to send actions to the actor
//! - [`ActorClient`] - Trait for domain clients wrapping a `ResourceClient`
//! - [`FrameworkError`] - Channel failures (actor gone, response dropped)
//!
//! # Testing
//!
//! See [`mock`] for a client that answers from scripted responses.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod error;
pub mod message;
pub mod mock;
pub mod resource;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use resource::ActorResource;
