use log::debug;
use serde_json::Number;

use super::{Block, ProofOfWork};
use crate::error::NodeError;
use crate::transaction::Transaction;

/// In-memory ledger: the sealed blocks plus the buffer of transactions
/// waiting for the next block.
///
/// The block sequence is never empty. Blocks only leave it when the whole
/// sequence is swapped out by [`Blockchain::replace_chain`].
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    pow: ProofOfWork,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(pow: ProofOfWork) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            pow,
        }
    }

    /// Queue a transaction for the next block and return that block's index.
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: Number,
    ) -> u64 {
        self.push_transaction(Transaction::new(sender, recipient, amount))
    }

    /// Queue an already built transaction; returns the same index as
    /// [`add_transaction`](Self::add_transaction).
    pub fn push_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        self.chain.len() as u64 + 1
    }

    /// Seal every pending transaction into a new block and append it.
    ///
    /// Without an explicit `previous_hash` the block links to the hash of the
    /// current last block. The pending buffer is emptied.
    pub fn seal_block(
        &mut self,
        proof: u64,
        previous_hash: Option<String>,
    ) -> Result<&Block, NodeError> {
        let previous_hash = match previous_hash {
            Some(h) => h,
            None => self.last_block()?.hash(),
        };
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(self.chain.len() as u64 + 1, transactions, proof, previous_hash);
        debug!(
            "sealed block #{} with {} txs (proof={})",
            block.index,
            block.transactions.len(),
            block.proof
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block, NodeError> {
        self.chain.last().ok_or(NodeError::EmptyChain)
    }

    /// Validate an arbitrary block sequence against this chain's puzzle.
    pub fn is_valid_chain(&self, chain: &[Block]) -> bool {
        Self::validate(&self.pow, chain)
    }

    /// Check linkage and proof-of-work of every adjacent pair in `chain`.
    /// The first block is taken as given; an empty sequence is invalid.
    pub fn validate(pow: &ProofOfWork, chain: &[Block]) -> bool {
        if chain.is_empty() {
            return false;
        }

        for pair in chain.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);

            // Check linkage
            if current.previous_hash != prev.hash() {
                debug!("block #{} does not link to its predecessor", current.index);
                return false;
            }

            // Check proof-of-work
            if !pow.valid(prev.proof, current.proof) {
                debug!("block #{} carries an invalid proof", current.index);
                return false;
            }
        }

        true
    }

    /// Validate the local chain.
    pub fn is_valid(&self) -> bool {
        self.is_valid_chain(&self.chain)
    }

    /// Swap the whole block sequence for `chain`. The pending buffer is kept.
    pub fn replace_chain(&mut self, chain: Vec<Block>) -> Result<(), NodeError> {
        if chain.is_empty() {
            return Err(NodeError::EmptyChain);
        }
        self.chain = chain;
        Ok(())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pow(&self) -> ProofOfWork {
        self.pow
    }
}

#[cfg(test)]
mod tests {
    use super::Blockchain;
    use crate::blockchain::ProofOfWork;
    use serde_json::Number;

    /// Mine `n` blocks the way a node does: search, reward, seal.
    fn mined(difficulty: usize, n: usize) -> Blockchain {
        let mut bc = Blockchain::new(ProofOfWork::new(difficulty));
        for _ in 0..n {
            let last = bc.last_block().unwrap().clone();
            let proof = bc.pow().search(last.proof);
            bc.add_transaction("0", "miner", Number::from(1));
            bc.seal_block(proof, Some(last.hash())).unwrap();
        }
        bc
    }

    #[test]
    fn new_chain_has_only_genesis() {
        let bc = Blockchain::new(ProofOfWork::new(1));
        assert_eq!(bc.len(), 1);
        assert!(bc.pending().is_empty());
        assert_eq!(bc.last_block().unwrap().previous_hash, "1");
        assert!(bc.is_valid());
    }

    #[test]
    fn add_transaction_returns_next_index() {
        let mut bc = Blockchain::new(ProofOfWork::new(1));
        assert_eq!(bc.add_transaction("a", "b", Number::from(5)), 2);
        assert_eq!(bc.add_transaction("c", "d", Number::from(-1)), 2);
        assert_eq!(bc.pending().len(), 2);
    }

    #[test]
    fn seal_consumes_pending_and_links() {
        let mut bc = Blockchain::new(ProofOfWork::new(1));
        bc.add_transaction("a", "b", Number::from(5));
        let genesis_hash = bc.last_block().unwrap().hash();
        let proof = bc.pow().search(100);

        let block = bc.seal_block(proof, None).unwrap().clone();
        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, genesis_hash);
        assert_eq!(block.transactions.len(), 1);
        assert!(bc.pending().is_empty());
        assert_eq!(bc.len(), 2);
    }

    #[test]
    fn explicit_previous_hash_is_used_verbatim() {
        let mut bc = Blockchain::new(ProofOfWork::new(1));
        let block = bc.seal_block(7, Some("abc".into())).unwrap();
        assert_eq!(block.previous_hash, "abc");
        assert!(!bc.is_valid());
    }

    #[test]
    fn mined_chain_keeps_linkage_invariant() {
        let bc = mined(1, 4);
        let blocks = bc.blocks();
        assert_eq!(blocks.len(), 5);
        for i in 1..blocks.len() {
            assert_eq!(blocks[i].previous_hash, blocks[i - 1].hash());
            assert_eq!(blocks[i].index, blocks[i - 1].index + 1);
        }
        assert!(bc.is_valid());
    }

    #[test]
    fn tampered_previous_hash_is_rejected() {
        let bc = mined(1, 3);
        for i in 1..bc.len() {
            let mut blocks = bc.blocks().to_vec();
            blocks[i].previous_hash = "forged".into();
            assert!(!bc.is_valid_chain(&blocks));
        }
    }

    #[test]
    fn tampered_proof_is_rejected() {
        let bc = mined(2, 3);
        for i in 1..bc.len() {
            let mut blocks = bc.blocks().to_vec();
            // Pick a proof that fails the puzzle for this pair.
            let prev_proof = blocks[i - 1].proof;
            let bad = (0..).find(|p| !bc.pow().valid(prev_proof, *p)).unwrap();
            blocks[i].proof = bad;
            assert!(!bc.is_valid_chain(&blocks));
        }
    }

    #[test]
    fn tampered_transaction_breaks_next_link() {
        let bc = mined(1, 2);
        let mut blocks = bc.blocks().to_vec();
        blocks[1].transactions[0].recipient = "thief".into();
        assert!(!bc.is_valid_chain(&blocks));
    }

    #[test]
    fn empty_chain_is_invalid_and_cannot_replace() {
        let mut bc = Blockchain::new(ProofOfWork::new(1));
        assert!(!bc.is_valid_chain(&[]));
        assert!(bc.replace_chain(Vec::new()).is_err());
        assert_eq!(bc.len(), 1);
    }

    #[test]
    fn replace_keeps_pending() {
        let mut bc = Blockchain::new(ProofOfWork::new(1));
        bc.add_transaction("a", "b", Number::from(1));
        let other = mined(1, 2);
        bc.replace_chain(other.blocks().to_vec()).unwrap();
        assert_eq!(bc.len(), 3);
        assert_eq!(bc.pending().len(), 1);
    }
}
