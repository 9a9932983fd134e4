use std::env;
use std::time::Duration;

use uuid::Uuid;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REWARD_RECIPIENT: &str = "Kevin";
const DEFAULT_PEER_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MINE_TIMEOUT_SECS: u64 = 600;

/// Node settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Identity used as the sender of mining rewards.
    pub node_address: String,
    pub reward_recipient: String,
    pub peer_timeout: Duration,
    pub mine_timeout: Duration,
    pub peers: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            node_address: Uuid::new_v4().simple().to_string(),
            reward_recipient: DEFAULT_REWARD_RECIPIENT.to_string(),
            peer_timeout: Duration::from_millis(DEFAULT_PEER_TIMEOUT_MS),
            mine_timeout: Duration::from_secs(DEFAULT_MINE_TIMEOUT_SECS),
            peers: Vec::new(),
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            node_address: non_empty("NODE_ADDRESS").unwrap_or(defaults.node_address),
            reward_recipient: non_empty("REWARD_RECIPIENT").unwrap_or(defaults.reward_recipient),
            peer_timeout: non_empty("PEER_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.peer_timeout),
            mine_timeout: non_empty("MINE_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.mine_timeout),
            peers: non_empty("PEERS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NodeConfig;
    use std::collections::HashMap;
    use std::time::Duration;

    fn from_pairs(pairs: &[(&str, &str)]) -> NodeConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = from_pairs(&[]);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.reward_recipient, "Kevin");
        assert_eq!(cfg.node_address.len(), 32);
        assert!(cfg.peers.is_empty());
    }

    #[test]
    fn reads_overrides_and_ignores_bad_numbers() {
        let cfg = from_pairs(&[
            ("PORT", "5001"),
            ("PEER_TIMEOUT_MS", "250"),
            ("MINE_TIMEOUT_SECS", "soon"),
            ("NODE_ADDRESS", "node-1"),
            ("PEERS", "127.0.0.1:5002, ,127.0.0.1:5003"),
        ]);
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.peer_timeout, Duration::from_millis(250));
        assert_eq!(cfg.mine_timeout, Duration::from_secs(600));
        assert_eq!(cfg.node_address, "node-1");
        assert_eq!(cfg.peers, vec!["127.0.0.1:5002", "127.0.0.1:5003"]);
    }
}
