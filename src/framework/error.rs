//! # Framework Errors
//!
//! Errors raised by the message plumbing itself, independent of any resource.
//! Resource error types absorb these through their `From<FrameworkError>` impl.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}
