use crate::directory::{DirectoryError, DirectoryReader, DirectoryWriter, ReaderAction, WriterAction};
use crate::framework::{ActorClient, ResourceClient};
use crate::model::{PickUpPoint, PickUpPointCreate};
use async_trait::async_trait;
use tracing::instrument;

/// Client for the read-only directory worker.
#[derive(Clone)]
pub struct DirectoryReaderClient {
    inner: ResourceClient<DirectoryReader>,
}

impl DirectoryReaderClient {
    pub fn new(inner: ResourceClient<DirectoryReader>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn read_all(&self) -> Result<Vec<PickUpPoint>, DirectoryError> {
        self.send(ReaderAction::ReadAll).await
    }
}

#[async_trait]
impl ActorClient<DirectoryReader> for DirectoryReaderClient {
    fn inner(&self) -> &ResourceClient<DirectoryReader> {
        &self.inner
    }
}

/// Client for the write-only directory worker.
#[derive(Clone)]
pub struct DirectoryWriterClient {
    inner: ResourceClient<DirectoryWriter>,
}

impl DirectoryWriterClient {
    pub fn new(inner: ResourceClient<DirectoryWriter>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn write(&self, params: PickUpPointCreate) -> Result<PickUpPoint, DirectoryError> {
        self.send(WriterAction::Write(params)).await
    }
}

#[async_trait]
impl ActorClient<DirectoryWriter> for DirectoryWriterClient {
    fn inner(&self) -> &ResourceClient<DirectoryWriter> {
        &self.inner
    }
}
