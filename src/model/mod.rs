//! Pure data structures persisted by the ledger and the directory.

pub mod order;
pub mod packaging;
pub mod pick_up_point;

pub use order::*;
pub use packaging::*;
pub use pick_up_point::*;
