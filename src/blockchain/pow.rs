use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::hash::sha256_hex;

/// How often the cancellable search polls its token.
const CANCEL_POLL_INTERVAL: u64 = 1024;

/// Hash puzzle over two consecutive proofs: `sha256("{last_proof}{proof}")`
/// must start with `difficulty` `'0'` hex digits.
///
/// Every extra digit multiplies the expected search cost by 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Check whether `proof` solves the puzzle posed by `last_proof`.
    ///
    /// Hashes the bare decimal concatenation, not a block.
    pub fn valid(&self, last_proof: u64, proof: u64) -> bool {
        let guess = format!("{last_proof}{proof}");
        let digest = sha256_hex(guess.as_bytes());
        digest.len() >= self.difficulty && digest.chars().take(self.difficulty).all(|c| c == '0')
    }

    /// Smallest non-negative proof that solves the puzzle. Runs until found.
    pub fn search(&self, last_proof: u64) -> u64 {
        let mut proof = 0u64;
        while !self.valid(last_proof, proof) {
            proof += 1;
        }
        proof
    }

    /// Same as [`search`](Self::search), but gives up with `None` once
    /// `cancel` is triggered.
    pub fn search_cancellable(&self, last_proof: u64, cancel: &CancelToken) -> Option<u64> {
        let mut proof = 0u64;
        loop {
            if proof % CANCEL_POLL_INTERVAL == 0 && cancel.is_cancelled() {
                return None;
            }
            if self.valid(last_proof, proof) {
                return Some(proof);
            }
            proof += 1;
        }
    }
}

/// Shared flag used to stop a running proof search from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
