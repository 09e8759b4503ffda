use crate::framework::FrameworkError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the pick-up point directory workers.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("actor communication error: {0}")]
    ActorCommunication(#[from] FrameworkError),
}
