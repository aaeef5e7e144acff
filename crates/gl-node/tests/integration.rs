/// Integration tests wiring the crates together end-to-end.
///
/// The pure data-path tests exercise mining, validation and reconciliation
/// without any networking.  The network tests spin up real nodes on
/// loopback ports and are guarded with timeouts.
use std::time::Duration;

use gl_chain::Chain;
use gl_node::{Node, NodeConfig, NodeEvent};
use gl_sync::{decide, SyncAction};
use libp2p::Multiaddr;
use tokio::{sync::mpsc, time};

// ── Pure data-path tests (no network) ───────────────────────────────────────

#[test]
fn mined_block_flows_through_reconciliation() {
    let mut local = Chain::new();
    let mut remote = Chain::new();

    let block = remote.mine_next("hello".into());
    remote.try_append(block).unwrap();

    // The remote tip links directly to our tip: plain append.
    let action = decide(local.tip(), vec![remote.tip().clone()]).unwrap();
    let SyncAction::AppendTip(block) = action else {
        panic!("expected an append decision");
    };
    local.try_append(block).unwrap();

    assert_eq!(local.len(), 2);
    assert_eq!(local.tip(), remote.tip());
}

#[test]
fn diverged_nodes_converge_on_longest_chain() {
    let mut a = Chain::new();
    let mut b = Chain::new();

    let block = a.mine_next("a-1".into());
    a.try_append(block).unwrap();
    for i in 0..3 {
        let block = b.mine_next(format!("b-{i}"));
        b.try_append(block).unwrap();
    }

    // b's announced tip does not link to a's tip and arrives alone, so a
    // first asks for the full chain, then adopts it wholesale.
    let action = decide(a.tip(), vec![b.tip().clone()]).unwrap();
    assert_eq!(action, SyncAction::RequestFullChain);

    let action = decide(a.tip(), b.blocks().to_vec()).unwrap();
    let SyncAction::ReplaceChain(blocks) = action else {
        panic!("expected a replace decision");
    };
    a.try_replace(blocks).unwrap();

    assert_eq!(a.len(), 4);
    assert_eq!(a.tip(), b.tip());
}

#[test]
fn equal_length_chains_leave_both_sides_alone() {
    let mut a = Chain::new();
    let mut b = Chain::new();

    let block = a.mine_next("a-1".into());
    a.try_append(block).unwrap();
    let block = b.mine_next("b-1".into());
    b.try_append(block).unwrap();

    assert_eq!(
        decide(a.tip(), vec![b.tip().clone()]).unwrap(),
        SyncAction::KeepLocal
    );
    assert_eq!(
        decide(b.tip(), vec![a.tip().clone()]).unwrap(),
        SyncAction::KeepLocal
    );
}

// ── Network-level smoke tests ────────────────────────────────────────────────

async fn wait_for_listen_addr(events: &mut mpsc::UnboundedReceiver<NodeEvent>) -> Multiaddr {
    time::timeout(Duration::from_secs(5), async {
        while let Some(event) = events.recv().await {
            if let NodeEvent::Listening(addr) = event {
                return addr;
            }
        }
        panic!("event channel closed before a listen address arrived");
    })
    .await
    .expect("node never reported a listen address")
}

#[tokio::test]
async fn node_starts_and_serves_its_chain() {
    let (node, mut events) = Node::new(NodeConfig::on_port(0))
        .await
        .expect("node should start");
    let handle = node.handle();
    tokio::spawn(node.run());

    let _addr = wait_for_listen_addr(&mut events).await;

    let chain = handle.chain().await.expect("chain query should succeed");
    assert_eq!(chain.len(), 1, "fresh node holds only genesis");
}

#[tokio::test]
async fn submitted_block_extends_the_chain() {
    let (node, mut events) = Node::new(NodeConfig::on_port(0)).await.unwrap();
    let handle = node.handle();
    tokio::spawn(node.run());

    let _addr = wait_for_listen_addr(&mut events).await;

    let block = handle.submit("payload".into()).await.expect("submit should succeed");
    assert_eq!(block.index, 1);

    let chain = handle.chain().await.unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.last().unwrap(), &block);
}

#[tokio::test]
async fn late_joiner_adopts_the_longer_chain() {
    // The seed node mines a block before anyone connects.
    let (seed, mut seed_events) = Node::new(NodeConfig::on_port(0)).await.unwrap();
    let seed_handle = seed.handle();
    tokio::spawn(seed.run());

    let seed_addr = wait_for_listen_addr(&mut seed_events).await;
    seed_handle.submit("mined before the join".into()).await.unwrap();

    // The joiner dials the seed; the connect-time latest-block query pulls
    // the missing block over.
    let config = NodeConfig::with_peers(0, vec![seed_addr]);
    let (joiner, mut joiner_events) = Node::new(config).await.unwrap();
    let joiner_handle = joiner.handle();
    tokio::spawn(joiner.run());

    let _addr = wait_for_listen_addr(&mut joiner_events).await;

    let caught_up = time::timeout(Duration::from_secs(10), async {
        loop {
            if joiner_handle.chain().await.unwrap().len() == 2 {
                break;
            }
            time::sleep(Duration::from_millis(100)).await;
        }
    })
    .await;
    assert!(caught_up.is_ok(), "joiner never caught up to the seed chain");

    let seed_chain = seed_handle.chain().await.unwrap();
    let joiner_chain = joiner_handle.chain().await.unwrap();
    assert_eq!(seed_chain, joiner_chain);
}
