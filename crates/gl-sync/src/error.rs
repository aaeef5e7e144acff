use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    #[error("peer sent a chain response with no blocks")]
    EmptyResponse,
}
