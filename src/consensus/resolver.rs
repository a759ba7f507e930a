use std::sync::Mutex;

use futures::future::join_all;
use log::{info, warn};

use super::fetch::{ChainFetcher, ChainSnapshot};
use crate::blockchain::{Block, Blockchain, ProofOfWork};
use crate::error::NodeError;

/// Longest-valid-chain rule: adopt the longest peer chain that is strictly
/// longer than the local one and passes full validation.
#[derive(Debug, Clone)]
pub struct ConsensusResolver<F> {
    fetcher: F,
}

impl<F: ChainFetcher> ConsensusResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Query every peer and replace `chain` if a better one is found.
    /// Returns whether the local chain was replaced.
    ///
    /// Peers are fetched concurrently without holding the lock; the swap
    /// itself happens under the lock and only if the winner is still longer
    /// than the local chain at that moment.
    pub async fn resolve(&self, chain: &Mutex<Blockchain>, peers: &[String]) -> bool {
        let (local_len, pow) = {
            let bc = chain.lock().expect("mutex poisoned");
            (bc.len(), bc.pow())
        };

        let results = join_all(peers.iter().map(|peer| self.fetcher.fetch_chain(peer))).await;
        let Some(winner) = select_longest(
            &pow,
            local_len,
            peers.iter().map(String::as_str).zip(results),
        ) else {
            info!("local chain is authoritative (length {local_len})");
            return false;
        };

        let mut bc = chain.lock().expect("mutex poisoned");
        if winner.len() <= bc.len() {
            warn!(
                "discarding peer chain of length {}: local chain grew to {}",
                winner.len(),
                bc.len()
            );
            return false;
        }
        let (old, new) = (bc.len(), winner.len());
        match bc.replace_chain(winner) {
            Ok(()) => {
                info!("replaced local chain ({old} -> {new} blocks)");
                true
            }
            Err(e) => {
                warn!("chain replacement failed: {e}");
                false
            }
        }
    }
}

/// Pick the first, strictly longest valid chain among peer answers.
///
/// A chain only counts when it beats `local_len` and every chain accepted
/// before it. Unreachable peers and chains whose reported length disagrees
/// with the blocks sent are skipped.
pub fn select_longest<'a>(
    pow: &ProofOfWork,
    local_len: usize,
    answers: impl IntoIterator<Item = (&'a str, Result<ChainSnapshot, NodeError>)>,
) -> Option<Vec<Block>> {
    let mut best = local_len;
    let mut winner = None;

    for (peer, answer) in answers {
        let snapshot = match answer {
            Ok(s) => s,
            Err(e) => {
                warn!("skipping peer {peer}: {e}");
                continue;
            }
        };
        if snapshot.length != snapshot.chain.len() {
            warn!(
                "skipping peer {peer}: reported length {} but sent {} blocks",
                snapshot.length,
                snapshot.chain.len()
            );
            continue;
        }
        if snapshot.length <= best {
            continue;
        }
        if !Blockchain::validate(pow, &snapshot.chain) {
            warn!("skipping peer {peer}: chain of length {} is invalid", snapshot.length);
            continue;
        }
        best = snapshot.length;
        winner = Some(snapshot.chain);
    }

    winner
}
