use gl_chain::Block;
use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// Protocol name spoken over each peer link.
pub const PROTOCOL_NAME: &str = "/gl/gossip/1.0.0";

const TAG_QUERY_LATEST: u8 = 0;
const TAG_QUERY_ALL: u8 = 1;
const TAG_CHAIN_RESPONSE: u8 = 2;

/// Messages exchanged over peer links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Ask a peer for its latest block.
    QueryLatest,

    /// Ask a peer for its whole chain.
    QueryAll,

    /// Blocks from a peer: either a single latest-block announcement or a
    /// full chain dump, discriminated only by length.
    ChainResponse(Vec<Block>),
}

/// On-the-wire shape: an integer tag plus an optional block sequence.
///
/// Queries carry no `data`; a chain response always does.  Block records
/// keep their five fields verbatim with hashes as lowercase hex text.
#[derive(Serialize, Deserialize)]
struct WireMessage {
    #[serde(rename = "type")]
    tag: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Vec<Block>>,
}

/// Encode a [`Message`] to its JSON wire form.
pub fn encode_message(message: &Message) -> Result<Vec<u8>, NodeError> {
    let wire = match message {
        Message::QueryLatest => WireMessage {
            tag: TAG_QUERY_LATEST,
            data: None,
        },
        Message::QueryAll => WireMessage {
            tag: TAG_QUERY_ALL,
            data: None,
        },
        Message::ChainResponse(blocks) => WireMessage {
            tag: TAG_CHAIN_RESPONSE,
            data: Some(blocks.clone()),
        },
    };

    serde_json::to_vec(&wire).map_err(|e| NodeError::Serialisation(e.to_string()))
}

/// Decode wire bytes into a [`Message`].
///
/// Undecodable bytes, an unknown tag, or a chain response without blocks
/// all fail with [`NodeError::MalformedMessage`]; the caller drops the
/// message and keeps the link alive.
pub fn decode_message(bytes: &[u8]) -> Result<Message, NodeError> {
    let wire: WireMessage =
        serde_json::from_slice(bytes).map_err(|e| NodeError::MalformedMessage(e.to_string()))?;

    match (wire.tag, wire.data) {
        (TAG_QUERY_LATEST, _) => Ok(Message::QueryLatest),
        (TAG_QUERY_ALL, _) => Ok(Message::QueryAll),
        (TAG_CHAIN_RESPONSE, Some(blocks)) => Ok(Message::ChainResponse(blocks)),
        (TAG_CHAIN_RESPONSE, None) => Err(NodeError::MalformedMessage(
            "chain response without block data".into(),
        )),
        (tag, _) => Err(NodeError::MalformedMessage(format!(
            "unknown message type {tag}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_integer_tags() {
        let encoded = encode_message(&Message::QueryLatest).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(value["type"], 0);
        assert!(value.get("data").is_none());

        let encoded = encode_message(&Message::QueryAll).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(value["type"], 1);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn chain_response_carries_block_records_verbatim() {
        let genesis = Block::genesis();
        let encoded = encode_message(&Message::ChainResponse(vec![genesis.clone()])).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();

        assert_eq!(value["type"], 2);
        let record = &value["data"][0];
        assert_eq!(record["index"], 0);
        assert_eq!(record["previousHash"], "0");
        assert_eq!(record["timestamp"], 1465154705);
        assert_eq!(record["data"], genesis.data.as_str());
        assert_eq!(record["hash"], genesis.hash.as_str());
    }

    #[test]
    fn decode_accepts_bare_queries() {
        assert_eq!(decode_message(br#"{"type":0}"#).unwrap(), Message::QueryLatest);
        assert_eq!(decode_message(br#"{"type":1}"#).unwrap(), Message::QueryAll);
    }

    #[test]
    fn malformed_messages_are_rejected() {
        // Not JSON at all.
        assert!(decode_message(b"not json").is_err());
        // Unknown tag.
        assert!(decode_message(br#"{"type":9}"#).is_err());
        // Chain response with the block sequence missing.
        assert!(decode_message(br#"{"type":2}"#).is_err());
    }
}
