use log::{debug, info, warn};

use super::ChainSource;
use crate::blockchain::{Block, is_chain_valid};
use crate::error::LedgerError;

/// Outcome of one reconciliation round.
#[derive(Debug)]
pub struct Reconciliation {
    pub adopted: bool,
    pub chain: Vec<Block>,
}

/// Longest-valid-chain rule.
///
/// Every peer is asked once; unreachable or malformed peers are skipped. A
/// peer chain wins only if it is strictly longer than everything seen so far
/// (starting from the local length) and validates. Among equally long
/// winners the first one visited is kept.
pub async fn reconcile<S: ChainSource>(
    source: &S,
    peers: &[String],
    local: &[Block],
) -> Reconciliation {
    let mut max_length = local.len();
    let mut longest: Option<Vec<Block>> = None;

    for peer in peers {
        let snapshot = match source.fetch_chain(peer).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("CONSENSUS - skipping peer: {e}");
                continue;
            }
        };

        if snapshot.length != snapshot.chain.len() {
            let e = LedgerError::PeerMalformedResponse {
                peer: peer.clone(),
                reason: format!(
                    "reported length {} but sent {} blocks",
                    snapshot.length,
                    snapshot.chain.len()
                ),
            };
            warn!("CONSENSUS - skipping peer: {e}");
            continue;
        }

        if snapshot.length <= max_length {
            debug!(
                "CONSENSUS - {peer} has {} blocks, not longer than {max_length}",
                snapshot.length
            );
            continue;
        }
        if !is_chain_valid(&snapshot.chain) {
            warn!("CONSENSUS - discarding invalid chain from {peer}");
            continue;
        }

        max_length = snapshot.length;
        longest = Some(snapshot.chain);
    }

    match longest {
        Some(chain) => {
            info!("CONSENSUS - adopting chain of {} blocks", chain.len());
            Reconciliation {
                adopted: true,
                chain,
            }
        }
        None => Reconciliation {
            adopted: false,
            chain: local.to_vec(),
        },
    }
}
