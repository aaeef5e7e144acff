use crate::{block::Block, error::ChainError};

/// Check that `candidate` is a valid direct successor of `predecessor`.
///
/// The checks run in a fixed order and the first violation is returned:
/// index continuity, previous-hash linkage, then content hash.  The caller
/// decides whether the failure condemns the block or the whole chain.
pub fn check_link(candidate: &Block, predecessor: &Block) -> Result<(), ChainError> {
    if candidate.index != predecessor.index + 1 {
        return Err(ChainError::InvalidIndex);
    }
    if candidate.previous_hash != predecessor.hash {
        return Err(ChainError::InvalidPreviousHash);
    }
    if candidate.content_hash() != candidate.hash {
        return Err(ChainError::InvalidHash);
    }
    Ok(())
}

/// Validate a whole candidate chain against the trusted genesis block.
///
/// The first block must be structurally equal to `genesis` — it has no
/// predecessor, so its hash is never recomputed — and every later block must
/// pass [`check_link`] against the one before it.  Stops at the first
/// failure.
pub fn check_chain(blocks: &[Block], genesis: &Block) -> Result<(), ChainError> {
    let first = blocks.first().ok_or(ChainError::Empty)?;
    if first != genesis {
        return Err(ChainError::InvalidGenesis);
    }

    for window in blocks.windows(2) {
        check_link(&window[1], &window[0])?;
    }

    Ok(())
}
