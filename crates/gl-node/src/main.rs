use clap::Parser;
use gl_node::{Node, NodeConfig, NodeHandle};
use libp2p::Multiaddr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// gossipledger node daemon.
#[derive(Parser, Debug)]
#[command(
    name = "gl-node",
    version,
    about = "gossipledger P2P node",
    long_about = "Runs a gossipledger node that mines blocks on request, \
                  gossips chain state with its peers, and adopts the longest \
                  valid chain it sees."
)]
struct Cli {
    /// TCP port to listen on.
    #[arg(short, long, default_value_t = 6001, env = "GL_PORT")]
    port: u16,

    /// Peer multiaddr to dial at startup.  May be given multiple times, or
    /// comma-separated via the environment.
    #[arg(long = "peer", env = "GL_PEERS", value_delimiter = ',')]
    peers: Vec<Multiaddr>,

    /// Suppress log output to stderr (run silently).
    #[arg(short, long, default_value_t = false, env = "GL_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_filter = if cli.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::from_default_env().add_directive("gl_node=info".parse()?)
    };
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    let config = NodeConfig {
        port: cli.port,
        peers: cli.peers,
        quiet: cli.quiet,
    };

    info!(
        port = config.port,
        initial_peers = config.peers.len(),
        "Starting gossipledger node"
    );

    let (node, mut events) = Node::new(config).await?;
    let handle = node.handle();

    info!("Peer id: {}", node.peer_id());

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!("NodeEvent: {event:?}");
        }
    });

    // Console commands arrive on stdin, one per line.
    let console = handle.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            run_console_command(&console, line.trim()).await;
        }
    });

    node.run().await;

    Ok(())
}

/// Minimal console in place of a request façade: `mine <payload>`, `chain`,
/// `peers`, `connect <multiaddr>`.
async fn run_console_command(handle: &NodeHandle, line: &str) {
    let (cmd, rest) = match line.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "" => {}

        "mine" => match handle.submit(rest.to_string()).await {
            Ok(block) => println!("mined block #{} {}", block.index, block.hash),
            Err(e) => warn!("mine failed: {e}"),
        },

        "chain" => match handle.chain().await {
            Ok(blocks) => {
                for block in blocks {
                    println!("#{} {} data={}", block.index, block.hash, block.data);
                }
            }
            Err(e) => warn!("chain query failed: {e}"),
        },

        "peers" => match handle.peers().await {
            Ok(peers) => {
                println!("{} peer(s)", peers.len());
                for peer in peers {
                    println!("{peer}");
                }
            }
            Err(e) => warn!("peer query failed: {e}"),
        },

        "connect" => match rest.parse::<Multiaddr>() {
            Ok(addr) => {
                if let Err(e) = handle.dial(addr) {
                    warn!("connect failed: {e}");
                }
            }
            Err(e) => warn!("not a valid multiaddr: {e}"),
        },

        other => println!("unknown command: {other} (try mine/chain/peers/connect)"),
    }
}
