use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};

use super::POW_PREFIX;

/// How many candidates are tried between checks of the cancel flag.
const CANCEL_CHECK_INTERVAL: u64 = 4096;

/// Fixed-difficulty puzzle: find `p` such that
/// `sha256(str(p² - previous²))` starts with [`POW_PREFIX`].
pub struct ProofOfWork;

impl ProofOfWork {
    /// Search `p = 1, 2, 3, ...` until a candidate satisfies the puzzle.
    /// Unbounded; terminates almost surely.
    pub fn solve(previous_proof: u64) -> u64 {
        let mut proof = 1u64;
        while !Self::is_valid_proof(previous_proof, proof) {
            proof += 1;
        }
        proof
    }

    /// Same search as [`ProofOfWork::solve`], giving up with `None` once
    /// `cancel` is raised.
    pub fn solve_cancellable(previous_proof: u64, cancel: &AtomicBool) -> Option<u64> {
        let mut proof = 1u64;
        loop {
            if (proof - 1) % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
                return None;
            }
            if Self::is_valid_proof(previous_proof, proof) {
                return Some(proof);
            }
            proof += 1;
        }
    }

    /// Check one `(previous, proof)` pair.
    pub fn is_valid_proof(previous_proof: u64, proof: u64) -> bool {
        Self::puzzle_hash(previous_proof, proof).starts_with(POW_PREFIX)
    }

    fn puzzle_hash(previous_proof: u64, proof: u64) -> String {
        // i128 holds u64² differences without overflow; the value may be negative.
        let p = proof as i128;
        let q = previous_proof as i128;
        let operation = p * p - q * q;
        hex::encode(Sha256::digest(operation.to_string().as_bytes()))
    }
}
