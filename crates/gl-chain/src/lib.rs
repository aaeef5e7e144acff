pub mod block;
pub mod chain;
pub mod error;
pub mod validate;

pub use block::{compute_hash, Block};
pub use chain::Chain;
pub use error::ChainError;
pub use validate::{check_chain, check_link};
