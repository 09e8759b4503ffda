//! Lock-guarded access to the pick-up point collection file.

use crate::directory::DirectoryError;
use crate::model::{PickUpPoint, PickUpPointCreate};
use crate::storage::JsonCollection;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::info;

/// Shared by the reader and writer workers.
///
/// Reads take the lock shared; a write holds it exclusively for its whole
/// load, append and save, so ids assigned as `count + 1` never collide. The
/// file lock extends the same rule to other processes using the file.
#[derive(Debug)]
pub struct PickUpPointStore {
    collection: RwLock<JsonCollection<PickUpPoint>>,
}

impl PickUpPointStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DirectoryError> {
        Ok(Self {
            collection: RwLock::new(JsonCollection::open(path).await?),
        })
    }

    pub async fn read_all(&self) -> Result<Vec<PickUpPoint>, DirectoryError> {
        let collection = self.collection.read().await;
        let _shared = collection.lock_shared().await?;
        Ok(collection.load().await?)
    }

    pub async fn write(&self, params: PickUpPointCreate) -> Result<PickUpPoint, DirectoryError> {
        let collection = self.collection.write().await;
        let _exclusive = collection.lock().await?;
        let mut points = collection.load().await?;
        let id = points.len() as i64 + 1;
        let point = PickUpPoint::new(id, params);
        points.push(point.clone());
        collection.save(&points).await?;
        info!(id, name = %point.name, "Pick-up point written");
        Ok(point)
    }
}
