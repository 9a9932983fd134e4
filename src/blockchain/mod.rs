pub mod block;
pub mod model;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use model::Ledger;
pub use pow::ProofOfWork;
pub use validator::is_chain_valid;

/// Proof stored in the genesis block.
pub const GENESIS_PROOF: u64 = 1;

/// `previous_hash` sentinel of the genesis block (64 zeros).
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Hex prefix a puzzle digest must carry. Difficulty is fixed.
pub const POW_PREFIX: &str = "0000";

/// Amount of the transaction the node pays itself for every mined block.
pub const MINING_REWARD: f64 = 1.0;

/// How many times a miner re-solves after the tip moved under it.
pub const MAX_MINE_ATTEMPTS: usize = 3;
