pub mod client;
pub mod consensus;
pub mod peers;

pub use client::{ChainSnapshot, ChainSource, HttpChainSource};
pub use consensus::{Reconciliation, reconcile};
pub use peers::PeerSet;

/// Path every node serves its chain on; peers are queried at this path.
pub const CHAIN_PATH: &str = "/api/v1/chain/";
