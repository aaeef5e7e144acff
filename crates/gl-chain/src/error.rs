use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChainError {
    #[error("block index does not follow its predecessor")]
    InvalidIndex,

    #[error("previous-hash link does not match the predecessor")]
    InvalidPreviousHash,

    #[error("block hash does not match its contents")]
    InvalidHash,

    #[error("first block does not match the genesis block")]
    InvalidGenesis,

    #[error("candidate chain is not longer than the local chain")]
    ChainNotLonger,

    #[error("chain is empty")]
    Empty,
}
