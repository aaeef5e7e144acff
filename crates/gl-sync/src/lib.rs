pub mod decision;
pub mod error;

pub use decision::{decide, SyncAction};
pub use error::SyncError;
