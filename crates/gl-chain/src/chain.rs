use crate::{
    block::Block,
    error::ChainError,
    validate::{check_chain, check_link},
};

/// The append-only ledger: an ordered, never-empty sequence of [`Block`]s.
///
/// Invariants maintained by this type:
/// - Always contains at least the genesis block.
/// - Every block's `previous_hash` matches the hash of the preceding block.
/// - Block indices are contiguous starting from 0.
///
/// The chain itself is not synchronised; the owning task serialises all
/// mutation and snapshot reads.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// Initialise a new ledger holding only the genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// Number of blocks in the chain (including genesis).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The most recent block.
    pub fn tip(&self) -> &Block {
        // Safety: always at least one block (genesis).
        self.blocks.last().unwrap()
    }

    /// All blocks in the chain.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Build (without appending) the successor of the current tip carrying
    /// `data`.
    pub fn mine_next(&self, data: String) -> Block {
        Block::next(self.tip(), data)
    }

    /// Append `candidate` iff it is a valid successor of the current tip.
    ///
    /// On rejection the chain is unchanged; the caller logs the reason and
    /// moves on.
    pub fn try_append(&mut self, candidate: Block) -> Result<(), ChainError> {
        check_link(&candidate, self.tip())?;
        self.blocks.push(candidate);
        Ok(())
    }

    /// Replace the whole ledger with `candidate` iff it validates against
    /// the genesis block and is strictly longer than the local chain.
    ///
    /// Validity and length are independent necessary conditions: a longer
    /// but invalid chain and a shorter but valid chain are both rejected,
    /// leaving the ledger unchanged.
    pub fn try_replace(&mut self, candidate: Vec<Block>) -> Result<(), ChainError> {
        check_chain(&candidate, &Block::genesis())?;
        if candidate.len() <= self.blocks.len() {
            return Err(ChainError::ChainNotLonger);
        }
        self.blocks = candidate;
        Ok(())
    }
}
