use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::consensus::{ConsensusResolver, HttpChainFetcher};
use crate::node::Node;
use crate::transaction::Transaction;

/// Shared application state: the node and the resolver used to reach its peers.
pub struct AppState {
    pub node: Node,
    pub resolver: ConsensusResolver<HttpChainFetcher>,
}

impl AppState {
    pub fn new(node: Node, fetcher: HttpChainFetcher) -> Self {
        Self {
            node,
            resolver: ConsensusResolver::new(fetcher),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    #[serde(flatten)]
    pub block: Block,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub message: String,
    pub valid: bool,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Peer API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: String,
    pub replaced: bool,
    pub chain: Vec<Block>,
    pub length: usize,
}
