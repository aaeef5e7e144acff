use std::time::Duration;

use futures::StreamExt;
use gl_chain::{Block, Chain};
use gl_sync::{decide, SyncAction};
use libp2p::{
    request_response::{self, Message as RrMessage},
    swarm::SwarmEvent,
    Multiaddr, PeerId, Swarm,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    behaviour::{build_behaviour, LedgerBehaviour, LedgerBehaviourEvent},
    config::NodeConfig,
    error::NodeError,
    event::NodeEvent,
    handle::{Command, NodeHandle},
    peers::PeerRegistry,
    protocol::{decode_message, encode_message, Message},
};

/// A ledger node.
///
/// Owns the [`Chain`] and the [`PeerRegistry`] outright; the single
/// [`run`](Node::run) loop serialises every mutation, whether it arrives
/// from a peer link or from a [`NodeHandle`] command, so no observer can
/// ever see a half-updated chain.
pub struct Node {
    swarm: Swarm<LedgerBehaviour>,
    local_peer_id: PeerId,
    chain: Chain,
    peers: PeerRegistry,
    event_tx: mpsc::UnboundedSender<NodeEvent>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
}

impl Node {
    /// Create and configure a new node from a [`NodeConfig`].
    ///
    /// Returns the node together with a receiver for [`NodeEvent`]s that
    /// the calling application can process independently.
    pub async fn new(
        config: NodeConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<NodeEvent>), NodeError> {
        let keypair = libp2p::identity::Keypair::generate_ed25519();
        let local_peer_id = keypair.public().to_peer_id();

        info!("Local peer id: {local_peer_id}");

        let listen_addr: Multiaddr = format!("/ip4/0.0.0.0/tcp/{}", config.port)
            .parse()
            .map_err(|e: libp2p::multiaddr::Error| NodeError::Transport(e.to_string()))?;

        let swarm = libp2p::SwarmBuilder::with_existing_identity(keypair)
            .with_tokio()
            .with_tcp(
                libp2p::tcp::Config::default(),
                libp2p::noise::Config::new,
                libp2p::yamux::Config::default,
            )
            .map_err(|e| NodeError::Transport(e.to_string()))?
            .with_behaviour(|_| build_behaviour())
            .map_err(|e| NodeError::Transport(e.to_string()))?
            .with_swarm_config(|cfg| {
                // Peer links are persistent: only an explicit close or a
                // transport error tears one down, never idleness.
                cfg.with_idle_connection_timeout(Duration::from_secs(3600))
            })
            .build();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let mut node = Self {
            swarm,
            local_peer_id,
            chain: Chain::new(),
            peers: PeerRegistry::new(),
            event_tx,
            cmd_tx,
            cmd_rx,
        };

        node.swarm
            .listen_on(listen_addr)
            .map_err(|e| NodeError::Transport(e.to_string()))?;

        for addr in config.peers {
            if let Err(e) = node.dial(addr.clone()) {
                warn!("dialing initial peer {addr} failed: {e}");
            }
        }

        Ok((node, event_rx))
    }

    /// Return the local [`PeerId`].
    pub fn peer_id(&self) -> PeerId {
        self.local_peer_id
    }

    /// Provide read access to the local chain.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// A cloneable handle for driving this node from other tasks.
    pub fn handle(&self) -> NodeHandle {
        NodeHandle::new(self.cmd_tx.clone())
    }

    /// Dial a remote peer by multiaddr.
    pub fn dial(&mut self, addr: Multiaddr) -> Result<(), NodeError> {
        self.swarm
            .dial(addr)
            .map_err(|e| NodeError::Transport(e.to_string()))
    }

    /// Mine a block carrying `data` on the current tip, append it, and
    /// announce the new tip to all peers.
    pub fn submit(&mut self, data: String) -> Result<Block, NodeError> {
        let block = self.chain.mine_next(data);
        self.chain.try_append(block.clone())?;

        info!("mined block #{}", block.index);
        self.broadcast_latest();
        let _ = self.event_tx.send(NodeEvent::BlockMined(block.clone()));

        Ok(block)
    }

    /// Run the node event loop.  This future runs until cancelled.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                event = self.swarm.select_next_some() => self.handle_swarm_event(event),
                Some(cmd) = self.cmd_rx.recv() => self.handle_command(cmd),
            }
        }
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit { data, reply } => {
                let _ = reply.send(self.submit(data));
            }
            Command::Chain { reply } => {
                let _ = reply.send(self.chain.blocks().to_vec());
            }
            Command::Peers { reply } => {
                let _ = reply.send(self.peers.peer_ids());
            }
            Command::Dial(addr) => {
                if let Err(e) = self.dial(addr) {
                    warn!("dial failed: {e}");
                }
            }
        }
    }

    fn handle_swarm_event(&mut self, event: SwarmEvent<LedgerBehaviourEvent>) {
        match event {
            SwarmEvent::NewListenAddr { address, .. } => {
                info!("Listening on {address}");
                let _ = self.event_tx.send(NodeEvent::Listening(address));
            }

            SwarmEvent::ConnectionEstablished { peer_id, endpoint, .. } => {
                info!("Connected to {peer_id}");
                let addr = endpoint.get_remote_address().clone();
                self.peers.insert(peer_id, addr);
                let _ = self.event_tx.send(NodeEvent::PeerConnected(peer_id));
                // Seed synchronisation without waiting for the peer to
                // speak first.
                self.send_message(&peer_id, &Message::QueryLatest);
            }

            SwarmEvent::ConnectionClosed { peer_id, .. } => {
                debug!("Disconnected from {peer_id}");
                self.peers.remove(&peer_id);
                let _ = self.event_tx.send(NodeEvent::PeerDisconnected(peer_id));
            }

            // Disconnect peers that fail to respond to pings — they are
            // considered dead.  The resulting ConnectionClosed event removes
            // them from the registry.
            SwarmEvent::Behaviour(LedgerBehaviourEvent::Ping(libp2p::ping::Event {
                peer,
                result: Err(_),
                ..
            })) => {
                debug!("Ping failed for {peer}, disconnecting");
                let _ = self.swarm.disconnect_peer_id(peer);
            }

            SwarmEvent::Behaviour(LedgerBehaviourEvent::RequestResponse(
                request_response::Event::Message { peer, message, .. },
            )) => {
                self.handle_link_message(peer, message);
            }

            SwarmEvent::Behaviour(LedgerBehaviourEvent::RequestResponse(
                request_response::Event::OutboundFailure { peer, error, .. },
            )) => {
                // Delivery is best-effort per link; a failed send to one
                // peer never aborts the sends to the others.
                warn!("send to {peer} failed: {error}");
            }

            _ => {}
        }
    }

    fn handle_link_message(&mut self, peer: PeerId, message: RrMessage<Vec<u8>, Vec<u8>>) {
        match message {
            RrMessage::Request { request, channel, .. } => {
                let reply = match decode_message(&request) {
                    Ok(msg) => self.dispatch(msg),
                    Err(e) => {
                        warn!("dropping message from {peer}: {e}");
                        None
                    }
                };

                let bytes = match reply.map(|msg| encode_message(&msg)) {
                    Some(Ok(bytes)) => bytes,
                    Some(Err(e)) => {
                        warn!("encoding reply failed: {e}");
                        Vec::new()
                    }
                    // Announcements are acknowledged with an empty response.
                    None => Vec::new(),
                };
                let _ = self
                    .swarm
                    .behaviour_mut()
                    .request_response
                    .send_response(channel, bytes);
            }

            RrMessage::Response { response, .. } => {
                // Empty responses are acknowledgements of our announcements.
                if response.is_empty() {
                    return;
                }
                match decode_message(&response) {
                    Ok(Message::ChainResponse(blocks)) => self.reconcile(blocks),
                    Ok(other) => warn!("unexpected reply from {peer}: {other:?}"),
                    Err(e) => warn!("dropping reply from {peer}: {e}"),
                }
            }
        }
    }

    /// Handle one inbound gossip message; the return value, if any, goes
    /// back to the sender on the link's response channel.
    fn dispatch(&mut self, message: Message) -> Option<Message> {
        match message {
            Message::QueryLatest => {
                Some(Message::ChainResponse(vec![self.chain.tip().clone()]))
            }
            Message::QueryAll => Some(Message::ChainResponse(self.chain.blocks().to_vec())),
            Message::ChainResponse(blocks) => {
                self.reconcile(blocks);
                None
            }
        }
    }

    /// Compare received blocks against the local chain and apply the
    /// outcome.  Rejected blocks and chains are logged and dropped; peers
    /// are not notified.
    fn reconcile(&mut self, blocks: Vec<Block>) {
        let action = match decide(self.chain.tip(), blocks) {
            Ok(action) => action,
            Err(e) => {
                warn!("ignoring chain response: {e}");
                return;
            }
        };

        match action {
            SyncAction::KeepLocal => {
                debug!("received chain is not ahead of ours");
            }

            SyncAction::AppendTip(block) => match self.chain.try_append(block.clone()) {
                Ok(()) => {
                    info!("appended block #{} from network", block.index);
                    self.broadcast_latest();
                    let _ = self.event_tx.send(NodeEvent::BlockAppended(block));
                }
                Err(e) => warn!("rejected block #{}: {e}", block.index),
            },

            SyncAction::RequestFullChain => {
                debug!("peer is ahead of us, querying full chains");
                self.broadcast(&Message::QueryAll);
            }

            SyncAction::ReplaceChain(blocks) => match self.chain.try_replace(blocks) {
                Ok(()) => {
                    let new_length = self.chain.len();
                    info!("replaced local chain, new length {new_length}");
                    self.broadcast_latest();
                    let _ = self.event_tx.send(NodeEvent::ChainReplaced { new_length });
                }
                Err(e) => warn!("rejected replacement chain: {e}"),
            },
        }
    }

    /// Send `message` independently to every registered peer.
    fn broadcast(&mut self, message: &Message) {
        for peer in self.peers.peer_ids() {
            self.send_message(&peer, message);
        }
    }

    /// Announce the current tip to all peers.
    fn broadcast_latest(&mut self) {
        let announcement = Message::ChainResponse(vec![self.chain.tip().clone()]);
        self.broadcast(&announcement);
    }

    /// Fire-and-forget send to one peer; delivery failures surface as
    /// outbound-failure events and are logged there.
    fn send_message(&mut self, peer: &PeerId, message: &Message) {
        match encode_message(message) {
            Ok(bytes) => {
                self.swarm
                    .behaviour_mut()
                    .request_response
                    .send_request(peer, bytes);
            }
            Err(e) => warn!("encoding message failed: {e}"),
        }
    }
}
