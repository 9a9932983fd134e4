use std::sync::Mutex;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger};
use crate::config::NodeConfig;
use crate::error::Result;
use crate::network::{HttpChainSource, PeerSet};
use crate::transaction::Transaction;

/// Shared application state: the ledger, the peer registry and the
/// outbound client used for reconciliation.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub peers: Mutex<PeerSet>,
    pub chain_source: HttpChainSource,
    pub config: NodeConfig,
}

impl AppState {
    pub fn new(config: NodeConfig) -> Result<Self> {
        let mut peers = PeerSet::new();
        for address in &config.peers {
            if let Err(e) = peers.add(address) {
                warn!("ignoring configured peer: {e}");
            }
        }
        if peers.is_empty() {
            info!("no peers configured; consensus keeps the local chain until nodes are registered");
        }
        Ok(Self {
            ledger: Mutex::new(Ledger::default()),
            peers: Mutex::new(peers),
            chain_source: HttpChainSource::new(config.peer_timeout)?,
            config,
        })
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub is_valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub timestamp: String,
    pub proof: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: "Congratulations, you just mined a block!".to_string(),
            index: block.index,
            timestamp: block.timestamp,
            proof: block.proof,
            previous_hash: block.previous_hash,
            transactions: block.transactions,
        }
    }
}

/* ---------- TX API Models ---------- */

/// Fields are optional so a missing one surfaces as `MissingField`
/// instead of a generic decode failure. An explicit `null` is treated the
/// same as an absent key.
#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct MempoolResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ConsensusResponse {
    pub replaced: bool,
    pub message: String,
    pub chain: Vec<Block>,
    pub length: usize,
}
