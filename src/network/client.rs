use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::CHAIN_PATH;
use crate::blockchain::Block;
use crate::error::{LedgerError, Result};

/// A peer's answer to a chain request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Where the reconciler gets peer chains from.
#[allow(async_fn_in_trait)]
pub trait ChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot>;
}

/// Fetches chains over HTTP with a per-request timeout.
#[derive(Clone)]
pub struct HttpChainSource {
    client: reqwest::Client,
}

impl HttpChainSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ChainSource for HttpChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot> {
        let url = format!("http://{peer}{CHAIN_PATH}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LedgerError::PeerUnreachable {
                peer: peer.to_string(),
                reason: e.to_string(),
            })?;
        if !resp.status().is_success() {
            return Err(LedgerError::PeerUnreachable {
                peer: peer.to_string(),
                reason: format!("status {}", resp.status()),
            });
        }
        resp.json::<ChainSnapshot>()
            .await
            .map_err(|e| LedgerError::PeerMalformedResponse {
                peer: peer.to_string(),
                reason: e.to_string(),
            })
    }
}
