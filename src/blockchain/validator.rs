use log::debug;

use super::{Block, ProofOfWork};

/// Validate hash linkage and proof-of-work across a whole chain.
///
/// The first block is trusted as genesis and not re-checked. A single-block
/// chain is valid; an empty chain is not.
pub fn is_chain_valid(chain: &[Block]) -> bool {
    if chain.is_empty() {
        return false;
    }

    chain.windows(2).all(|pair| {
        let (previous, current) = (&pair[0], &pair[1]);

        // Check linkage
        match previous.digest() {
            Ok(hash) if hash == current.previous_hash => {}
            _ => {
                debug!("block #{} does not link to its parent", current.index);
                return false;
            }
        }

        // Check puzzle
        if !ProofOfWork::is_valid_proof(previous.proof, current.proof) {
            debug!("block #{} carries an invalid proof", current.index);
            return false;
        }
        true
    })
}
