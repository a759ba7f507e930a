use std::sync::Mutex;

use log::{debug, info};
use serde_json::Number;

use crate::blockchain::{Block, Blockchain, CancelToken, ProofOfWork};
use crate::config::NodeConfig;
use crate::consensus::{ChainFetcher, ChainSnapshot, ConsensusResolver, PeerRegistry};
use crate::error::NodeError;
use crate::transaction::Transaction;

/// A ledger node: the chain, its known peers and its mining identity.
///
/// Owned by the request layer and shared between handlers. All chain
/// mutations go through the single chain mutex.
#[derive(Debug)]
pub struct Node {
    chain: Mutex<Blockchain>,
    peers: Mutex<PeerRegistry>,
    node_id: String,
    reward: Number,
    cancel: CancelToken,
}

impl Node {
    pub fn new(node_id: impl Into<String>, pow: ProofOfWork, reward: Number) -> Self {
        Self {
            chain: Mutex::new(Blockchain::new(pow)),
            peers: Mutex::new(PeerRegistry::new()),
            node_id: node_id.into(),
            reward,
            cancel: CancelToken::new(),
        }
    }

    /// Build a node from config, registering its bootstrap peers.
    pub fn from_config(config: &NodeConfig) -> Result<Self, NodeError> {
        let node = Self::new(
            config.node_id.clone(),
            ProofOfWork::new(config.difficulty),
            config.reward.clone(),
        );
        node.register_peers(&config.bootstrap_peers)?;
        Ok(node)
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn submit_transaction(&self, tx: Transaction) -> u64 {
        let mut bc = self.chain.lock().expect("mutex poisoned");
        let index = bc.add_transaction(tx.sender, tx.recipient, tx.amount);
        debug!("transaction queued for block #{index} (pending={})", bc.pending().len());
        index
    }

    /// Mine one block: solve the puzzle for the current tip, pay the reward
    /// to this node and seal every pending transaction.
    ///
    /// The search runs without the chain lock. If the tip changed meanwhile
    /// (another block was sealed or the chain was replaced) the search starts
    /// over from the new tip. Blocks the calling thread.
    pub fn mine(&self) -> Result<Block, NodeError> {
        loop {
            let (pow, last_proof, last_hash) = {
                let bc = self.chain.lock().expect("mutex poisoned");
                let last = bc.last_block()?;
                (bc.pow(), last.proof, last.hash())
            };

            debug!("searching proof after {last_proof} (difficulty={})", pow.difficulty());
            let proof = pow
                .search_cancellable(last_proof, &self.cancel)
                .ok_or(NodeError::MiningCancelled)?;

            let mut bc = self.chain.lock().expect("mutex poisoned");
            if bc.last_block()?.hash() != last_hash {
                debug!("tip moved while mining, restarting search");
                continue;
            }
            bc.push_transaction(Transaction::reward(self.node_id.clone(), self.reward.clone()));
            let block = bc.seal_block(proof, Some(last_hash))?.clone();
            info!(
                "MINER - sealed block #{} (proof={}, txs={})",
                block.index,
                block.proof,
                block.transactions.len()
            );
            return Ok(block);
        }
    }

    /// Stop any running and future proof search.
    pub fn cancel_mining(&self) {
        self.cancel.cancel();
    }

    /// Full block sequence plus its length.
    pub fn chain(&self) -> ChainSnapshot {
        let bc = self.chain.lock().expect("mutex poisoned");
        ChainSnapshot {
            chain: bc.blocks().to_vec(),
            length: bc.len(),
        }
    }

    pub fn pending(&self) -> Vec<Transaction> {
        let bc = self.chain.lock().expect("mutex poisoned");
        bc.pending().to_vec()
    }

    pub fn is_valid(&self) -> bool {
        let bc = self.chain.lock().expect("mutex poisoned");
        bc.is_valid()
    }

    /// Register peers (all or nothing) and return the full peer list.
    pub fn register_peers<S: AsRef<str>>(&self, addresses: &[S]) -> Result<Vec<String>, NodeError> {
        let mut peers = self.peers.lock().expect("mutex poisoned");
        peers.register_all(addresses)?;
        Ok(peers.list())
    }

    pub fn peers(&self) -> Vec<String> {
        let peers = self.peers.lock().expect("mutex poisoned");
        peers.list()
    }

    /// Run the longest-valid-chain rule against every known peer.
    /// Returns whether the chain was replaced and the resulting chain.
    pub async fn resolve_consensus<F: ChainFetcher>(
        &self,
        resolver: &ConsensusResolver<F>,
    ) -> (bool, ChainSnapshot) {
        let peers = self.peers();
        let replaced = resolver.resolve(&self.chain, &peers).await;
        (replaced, self.chain())
    }
}
