//! The two single-purpose directory workers.
//!
//! Each is an [`ActorResource`] over the same [`PickUpPointStore`]: one only reads,
//! one only writes. Every request is answered before the next is taken.

use crate::directory::{DirectoryError, PickUpPointStore};
use crate::framework::ActorResource;
use crate::model::{PickUpPoint, PickUpPointCreate};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug)]
pub enum ReaderAction {
    ReadAll,
}

#[derive(Debug)]
pub enum WriterAction {
    Write(PickUpPointCreate),
}

#[derive(Debug)]
pub struct DirectoryReader {
    store: Arc<PickUpPointStore>,
}

impl DirectoryReader {
    pub fn new(store: Arc<PickUpPointStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ActorResource for DirectoryReader {
    type Action = ReaderAction;
    type ActionResult = Vec<PickUpPoint>;
    type Context = ();
    type Error = DirectoryError;

    async fn handle_action(
        &mut self,
        action: ReaderAction,
        _ctx: &(),
    ) -> Result<Vec<PickUpPoint>, DirectoryError> {
        match action {
            ReaderAction::ReadAll => self.store.read_all().await,
        }
    }
}

#[derive(Debug)]
pub struct DirectoryWriter {
    store: Arc<PickUpPointStore>,
}

impl DirectoryWriter {
    pub fn new(store: Arc<PickUpPointStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ActorResource for DirectoryWriter {
    type Action = WriterAction;
    type ActionResult = PickUpPoint;
    type Context = ();
    type Error = DirectoryError;

    async fn handle_action(
        &mut self,
        action: WriterAction,
        _ctx: &(),
    ) -> Result<PickUpPoint, DirectoryError> {
        match action {
            WriterAction::Write(params) => self.store.write(params).await,
        }
    }
}
