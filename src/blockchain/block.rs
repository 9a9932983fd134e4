use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::transaction::Transaction;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A single block in the chain. Blocks do not cache their own hash; the
/// next block commits to it through `previous_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String, // UTC wall clock
    pub proof: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        proof: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            proof,
            previous_hash,
            transactions,
        }
    }

    /// SHA-256 over the canonical JSON form of the block, hex encoded.
    ///
    /// The block is first turned into a `serde_json::Value`, whose objects
    /// keep their keys sorted, so neither struct field order nor the key
    /// order of a decoded peer payload changes the result.
    pub fn digest(&self) -> Result<String> {
        let canonical = serde_json::to_value(self)?;
        let bytes = serde_json::to_vec(&canonical)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}
