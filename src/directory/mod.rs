//! Pick-up point directory: a flat-file collection reached through a reader
//! worker and a writer worker.

pub mod entity;
pub mod error;
pub mod store;

pub use entity::*;
pub use error::*;
pub use store::PickUpPointStore;

use crate::clients::{DirectoryReaderClient, DirectoryWriterClient};
use crate::framework::ResourceActor;
use std::sync::Arc;

/// Creates the reader and writer actors over one shared store.
pub fn new(
    store: Arc<PickUpPointStore>,
    buffer_size: usize,
) -> (
    (ResourceActor<DirectoryReader>, DirectoryReaderClient),
    (ResourceActor<DirectoryWriter>, DirectoryWriterClient),
) {
    let (reader, reader_client) = ResourceActor::new(DirectoryReader::new(store.clone()), buffer_size);
    let (writer, writer_client) = ResourceActor::new(DirectoryWriter::new(store), buffer_size);
    (
        (reader, DirectoryReaderClient::new(reader_client)),
        (writer, DirectoryWriterClient::new(writer_client)),
    )
}
