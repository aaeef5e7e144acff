use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialisation error: {0}")]
    Serialisation(String),

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("chain error: {0}")]
    Chain(#[from] gl_chain::ChainError),

    #[error("sync error: {0}")]
    Sync(#[from] gl_sync::SyncError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("node task has shut down")]
    Shutdown,
}
