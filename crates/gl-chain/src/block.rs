use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Timestamp of the hardcoded genesis block (Unix seconds).
const GENESIS_TIMESTAMP: i64 = 1465154705;

/// Payload of the hardcoded genesis block.
const GENESIS_DATA: &str = "my genesis block!!";

/// Hash of the hardcoded genesis block.
///
/// This is a fixed constant, not a recomputed digest: the genesis block is
/// trusted by fiat and is only ever compared by full structural equality.
/// Every node must carry the identical constant or chains can never
/// reconcile.
const GENESIS_HASH: &str = "816534932c2b7154836da6afc367695e6337db8a921823784c14378abed4f7d7";

/// A single block in the replicated ledger.
///
/// Blocks are immutable once constructed.  The serialised field names are
/// part of the wire format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Sequential block height (genesis = 0).
    pub index: u64,

    /// Lowercase-hex SHA-256 hash of the previous block.  `"0"` for genesis.
    pub previous_hash: String,

    /// Unix timestamp (seconds) supplied by the producer.  Not validated for
    /// monotonicity or clock skew.
    pub timestamp: i64,

    /// Opaque payload, already in its final encoded form.
    pub data: String,

    /// Lowercase-hex SHA-256 digest binding the four fields above.
    pub hash: String,
}

/// Compute the digest that binds a block's contents.
///
/// The preimage is the byte concatenation of the fields with integers
/// rendered as canonical decimal text (no sign, no fraction, no leading
/// zeros).  The rendering must be byte-identical on every node for hashes
/// to agree.
pub fn compute_hash(index: u64, previous_hash: &str, timestamp: i64, data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(previous_hash.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

impl Block {
    /// Build the successor of `previous` carrying `data`, stamped with the
    /// current wall-clock time.
    pub fn next(previous: &Block, data: String) -> Self {
        let index = previous.index + 1;
        let timestamp = Utc::now().timestamp();
        let hash = compute_hash(index, &previous.hash, timestamp, &data);

        Self {
            index,
            previous_hash: previous.hash.clone(),
            timestamp,
            data,
            hash,
        }
    }

    /// The hardcoded genesis block.  Its `hash` field is a fixed constant
    /// rather than a recomputed digest; see `GENESIS_HASH`.
    pub fn genesis() -> Self {
        Self {
            index: 0,
            previous_hash: "0".into(),
            timestamp: GENESIS_TIMESTAMP,
            data: GENESIS_DATA.into(),
            hash: GENESIS_HASH.into(),
        }
    }

    /// Recompute the digest over this block's contents, ignoring the stored
    /// `hash` field.  Validation compares the result against `hash`.
    pub fn content_hash(&self) -> String {
        compute_hash(self.index, &self.previous_hash, self.timestamp, &self.data)
    }
}
