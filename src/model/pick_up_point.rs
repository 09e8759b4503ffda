//! A pick-up point directory entry, managed through the interactive session.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickUpPoint {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact: String,
}

/// Payload for adding a pick-up point; the id is assigned on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickUpPointCreate {
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl PickUpPoint {
    pub fn new(id: i64, params: PickUpPointCreate) -> Self {
        Self {
            id,
            name: params.name,
            address: params.address,
            contact: params.contact,
        }
    }
}

impl Display for PickUpPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} | {} | {}",
            self.id, self.name, self.address, self.contact
        )
    }
}
