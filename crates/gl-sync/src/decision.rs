use gl_chain::Block;

use crate::SyncError;

/// Outcome of comparing a peer's blocks against the local tip.
///
/// The caller applies the action: mutate the ledger, talk to peers, or do
/// nothing.  Producing the decision never touches either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// The local chain is at least as long; discard the received blocks.
    KeepLocal,

    /// The received tip directly extends the local tip; append it and
    /// announce the new tip to all peers.
    AppendTip(Block),

    /// A single received block is ahead but does not link to the local tip;
    /// ask all peers for their full chain.
    RequestFullChain,

    /// The received blocks form a longer chain; attempt wholesale
    /// replacement and announce the new tip on success.
    ReplaceChain(Vec<Block>),
}

/// Decide how to reconcile `received` blocks from a peer with the local tip.
///
/// The four branches are ordered by priority and mutually exclusive.  Two
/// honest nodes must evaluate them identically or their chains can diverge
/// permanently, so the comparison happens on a defensive ascending sort —
/// transport order is not guaranteed.
pub fn decide(local_tip: &Block, mut received: Vec<Block>) -> Result<SyncAction, SyncError> {
    received.sort_by_key(|block| block.index);

    let latest = match received.last() {
        Some(block) => block,
        None => return Err(SyncError::EmptyResponse),
    };

    let action = if latest.index <= local_tip.index {
        SyncAction::KeepLocal
    } else if latest.previous_hash == local_tip.hash {
        SyncAction::AppendTip(latest.clone())
    } else if received.len() == 1 {
        SyncAction::RequestFullChain
    } else {
        SyncAction::ReplaceChain(received)
    };

    Ok(action)
}

#[cfg(test)]
mod tests {
    use gl_chain::Chain;

    use super::*;

    /// A chain whose tip has the given index.
    fn chain_to(tip_index: u64) -> Chain {
        let mut chain = Chain::new();
        for i in 1..=tip_index {
            let block = chain.mine_next(format!("payload-{i}"));
            chain.try_append(block).unwrap();
        }
        chain
    }

    #[test]
    fn equal_or_shorter_keeps_local() {
        let local = chain_to(5);
        let remote = chain_to(5);

        let action = decide(local.tip(), vec![remote.tip().clone()]).unwrap();
        assert_eq!(action, SyncAction::KeepLocal);

        let behind = chain_to(3);
        let action = decide(local.tip(), vec![behind.tip().clone()]).unwrap();
        assert_eq!(action, SyncAction::KeepLocal);
    }

    #[test]
    fn linked_successor_is_appended() {
        let local = chain_to(5);
        let next = local.mine_next("payload-6".into());

        let action = decide(local.tip(), vec![next.clone()]).unwrap();
        assert_eq!(action, SyncAction::AppendTip(next));
    }

    #[test]
    fn unlinked_single_block_requests_full_chain() {
        let local = chain_to(5);
        let remote = chain_to(7);

        let action = decide(local.tip(), vec![remote.tip().clone()]).unwrap();
        assert_eq!(action, SyncAction::RequestFullChain);
    }

    #[test]
    fn longer_multi_block_chain_is_adopted() {
        let local = chain_to(5);
        let remote = chain_to(8);
        let blocks = remote.blocks()[6..].to_vec();

        let action = decide(local.tip(), blocks.clone()).unwrap();
        assert_eq!(action, SyncAction::ReplaceChain(blocks));
    }

    #[test]
    fn received_blocks_are_sorted_before_comparison() {
        let local = chain_to(2);
        let remote = chain_to(4);

        // Deliver the remote chain tip-first; the decision must still see
        // the highest index as the latest block.
        let mut shuffled = remote.blocks().to_vec();
        shuffled.reverse();

        let action = decide(local.tip(), shuffled).unwrap();
        assert_eq!(action, SyncAction::ReplaceChain(remote.blocks().to_vec()));
    }

    #[test]
    fn empty_response_is_an_error() {
        let local = chain_to(1);
        assert_eq!(decide(local.tip(), vec![]), Err(SyncError::EmptyResponse));
    }
}
