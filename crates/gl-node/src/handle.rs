use gl_chain::Block;
use libp2p::{Multiaddr, PeerId};
use tokio::sync::{mpsc, oneshot};

use crate::error::NodeError;

/// Commands forwarded into the node event loop.
#[derive(Debug)]
pub enum Command {
    /// Mine a block carrying `data` on the current tip, append it, and
    /// announce the new tip to all peers.
    Submit {
        data: String,
        reply: oneshot::Sender<Result<Block, NodeError>>,
    },

    /// A consistent snapshot of the whole chain.
    Chain {
        reply: oneshot::Sender<Vec<Block>>,
    },

    /// Currently connected peers.
    Peers {
        reply: oneshot::Sender<Vec<PeerId>>,
    },

    /// Open a link to a remote peer.
    Dial(Multiaddr),
}

/// Cloneable handle for driving a [`Node`](crate::Node) from other tasks.
///
/// Every operation is serialised through the node's event loop, so a
/// snapshot returned by [`chain`](NodeHandle::chain) can never observe a
/// half-applied mutation.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl NodeHandle {
    pub(crate) fn new(cmd_tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { cmd_tx }
    }

    /// Mine and append a block carrying `data`, announcing the new tip.
    pub async fn submit(&self, data: String) -> Result<Block, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Submit { data, reply })
            .map_err(|_| NodeError::Shutdown)?;
        rx.await.map_err(|_| NodeError::Shutdown)?
    }

    /// A consistent snapshot of the whole chain.
    pub async fn chain(&self) -> Result<Vec<Block>, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Chain { reply })
            .map_err(|_| NodeError::Shutdown)?;
        rx.await.map_err(|_| NodeError::Shutdown)
    }

    /// Ids of all currently connected peers.
    pub async fn peers(&self) -> Result<Vec<PeerId>, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Peers { reply })
            .map_err(|_| NodeError::Shutdown)?;
        rx.await.map_err(|_| NodeError::Shutdown)
    }

    /// Ask the node to dial a remote peer.  Connection progress surfaces as
    /// [`NodeEvent`](crate::NodeEvent)s.
    pub fn dial(&self, addr: Multiaddr) -> Result<(), NodeError> {
        self.cmd_tx
            .send(Command::Dial(addr))
            .map_err(|_| NodeError::Shutdown)
    }
}
