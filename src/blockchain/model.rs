use log::{debug, info, warn};

use super::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF, is_chain_valid};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// In-memory chain plus the pool of transactions waiting for the next block.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Initialize a ledger holding only the genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        ledger.create_genesis_block();
        ledger
    }

    fn create_genesis_block(&mut self) {
        self.chain.push(Block::new(
            1,
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
            Vec::new(),
        ));
    }

    /// Return the last block in the chain.
    pub fn latest_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Queue a transaction and return the index of the block that will hold it.
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
    ) -> Result<u64> {
        let next_index = self.latest_block()?.index + 1;
        self.pending.push(Transaction::new(sender, receiver, amount));
        debug!(
            "pending pool grew to {} (next block #{})",
            self.pending.len(),
            next_index
        );
        Ok(next_index)
    }

    /// Append a block holding the whole pending pool and clear the pool.
    /// This is the only place the chain grows.
    pub fn commit_block(&mut self, proof: u64, previous_hash: String) -> Block {
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(index, proof, previous_hash, transactions);
        self.chain.push(block.clone());
        info!(
            "committed block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        block
    }

    /// Commit a block solved outside the lock. Fails with `StaleTip`, leaving
    /// the ledger untouched, when `previous_hash` is no longer the digest of
    /// the latest block. Otherwise the reward is queued and the block committed.
    pub fn seal_block(
        &mut self,
        proof: u64,
        previous_hash: String,
        reward: Transaction,
    ) -> Result<Block> {
        let tip_hash = self.latest_block()?.digest()?;
        if tip_hash != previous_hash {
            warn!("refusing stale block: tip is {tip_hash}, miner built on {previous_hash}");
            return Err(LedgerError::StaleTip);
        }
        self.pending.push(reward);
        Ok(self.commit_block(proof, previous_hash))
    }

    /// Swap in `candidate` when it is strictly longer than the local chain and
    /// valid. Returns whether the chain was replaced.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() <= self.chain.len() || !is_chain_valid(&candidate) {
            return false;
        }
        info!(
            "replacing local chain ({} blocks) with peer chain ({} blocks)",
            self.chain.len(),
            candidate.len()
        );
        self.chain = candidate;
        true
    }

    /// Validate the local chain.
    pub fn is_valid(&self) -> bool {
        is_chain_valid(&self.chain)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Ledger;
    use crate::blockchain::{GENESIS_PREVIOUS_HASH, ProofOfWork};
    use crate::error::LedgerError;
    use crate::transaction::Transaction;

    fn mine(ledger: &mut Ledger) {
        let last = ledger.latest_block().unwrap().clone();
        let proof = ProofOfWork::solve(last.proof);
        ledger.commit_block(proof, last.digest().unwrap());
    }

    #[test]
    fn starts_with_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);
        let genesis = ledger.latest_block().unwrap();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, 1);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(genesis.transactions.is_empty());
    }

    #[test]
    fn add_transaction_returns_next_index() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.add_transaction("a", "b", 1.0).unwrap(), 2);
        assert_eq!(ledger.add_transaction("b", "c", -4.0).unwrap(), 2);
        assert_eq!(ledger.pending().len(), 2);
    }

    #[test]
    fn commit_drains_pool_into_block() {
        let mut ledger = Ledger::new();
        ledger.add_transaction("alice", "bob", 3.0).unwrap();
        let prev = ledger.latest_block().unwrap().digest().unwrap();
        let block = ledger.commit_block(533, prev);

        assert_eq!(block.index, 2);
        assert_eq!(block.transactions, vec![Transaction::new("alice", "bob", 3.0)]);
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn mining_twice_links_blocks() {
        let mut ledger = Ledger::new();
        mine(&mut ledger);
        mine(&mut ledger);

        assert_eq!(ledger.len(), 3);
        let chain = ledger.chain();
        assert_eq!(chain[2].previous_hash, chain[1].digest().unwrap());
        assert!(ledger.is_valid());
    }

    #[test]
    fn seal_rejects_stale_tip_without_mutation() {
        let mut ledger = Ledger::new();
        ledger.add_transaction("a", "b", 1.0).unwrap();
        let err = ledger
            .seal_block(1, "f".repeat(64), Transaction::new("node", "miner", 1.0))
            .unwrap_err();

        assert!(matches!(err, LedgerError::StaleTip));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.pending().len(), 1);
    }

    #[test]
    fn seal_appends_reward_last() {
        let mut ledger = Ledger::new();
        ledger.add_transaction("a", "b", 1.0).unwrap();
        let genesis = ledger.latest_block().unwrap().clone();
        let proof = ProofOfWork::solve(genesis.proof);
        let block = ledger
            .seal_block(
                proof,
                genesis.digest().unwrap(),
                Transaction::new("node", "miner", 1.0),
            )
            .unwrap();

        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.transactions[1].sender, "node");
        assert!(ledger.is_valid());
    }

    #[test]
    fn replace_requires_strictly_longer_valid_chain() {
        let mut ours = Ledger::new();
        mine(&mut ours);

        let mut theirs = Ledger::new();
        mine(&mut theirs);
        assert!(!ours.replace_chain(theirs.chain().to_vec()));

        mine(&mut theirs);
        let mut tampered = theirs.chain().to_vec();
        tampered[1].proof += 1;
        assert!(!ours.replace_chain(tampered));

        assert!(ours.replace_chain(theirs.chain().to_vec()));
        assert_eq!(ours.len(), 3);
    }
}
