use reqwest::Url;

use crate::error::{LedgerError, Result};

/// Registry of peer locations (`host:port`).
///
/// Kept as an ordered list deduplicated on insert, so reconciliation visits
/// peers in registration order and ties go to the first one registered.
#[derive(Debug, Default, Clone)]
pub struct PeerSet {
    nodes: Vec<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer from a URL such as `http://127.0.0.1:5001` or a bare
    /// `127.0.0.1:5001`. Returns `false` when the peer was already known.
    pub fn add(&mut self, address: &str) -> Result<bool> {
        let location = normalize(address)?;
        if self.nodes.contains(&location) {
            return Ok(false);
        }
        self.nodes.push(location);
        Ok(true)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.nodes.clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Reduce an address to its network location (`host[:port]`).
fn normalize(address: &str) -> Result<String> {
    let trimmed = address.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let url =
        Url::parse(&with_scheme).map_err(|_| LedgerError::InvalidPeerAddress(address.into()))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LedgerError::InvalidPeerAddress(address.into()))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
