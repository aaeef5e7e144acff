use libp2p::Multiaddr;

/// Full configuration for a [`crate::Node`].
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// TCP port the node listens on.  Defaults to `6001`.
    pub port: u16,

    /// Peers to dial as soon as the node starts.
    pub peers: Vec<Multiaddr>,

    /// When `true` the binary embedding this node should suppress log output
    /// to stderr so the node runs silently.  The library itself does not
    /// initialise a tracing subscriber; this flag is a signal to the host
    /// binary.
    pub quiet: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            port: 6001,
            peers: Vec::new(),
            quiet: false,
        }
    }
}

impl NodeConfig {
    /// Create a config listening on a specific port with no initial peers.
    pub fn on_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Create a config that dials `peers` at startup.
    pub fn with_peers(port: u16, peers: Vec<Multiaddr>) -> Self {
        Self {
            port,
            peers,
            ..Self::default()
        }
    }
}
