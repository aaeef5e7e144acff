use gl_chain::Block;
use libp2p::{Multiaddr, PeerId};

/// High-level events emitted by a running [`Node`](crate::Node) that
/// callers can consume via a channel.
#[derive(Debug, Clone)]
pub enum NodeEvent {
    /// The node is now listening on the given address.
    Listening(Multiaddr),

    /// A new peer link has opened.
    PeerConnected(PeerId),

    /// A peer link has closed.
    PeerDisconnected(PeerId),

    /// A block was mined locally and appended to the ledger.
    BlockMined(Block),

    /// A block received from a peer extended the local chain.
    BlockAppended(Block),

    /// The local chain was replaced by a longer chain from a peer.
    ChainReplaced { new_length: usize },
}
