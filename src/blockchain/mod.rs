pub mod block;
pub mod hash;
pub mod model;
pub mod pow;

pub use block::Block;
pub use model::Blockchain;
pub use pow::{CancelToken, ProofOfWork};

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Upper bound for a configured difficulty; a SHA-256 hex digest has 64 digits.
pub const MAX_DIFFICULTY: usize = 64;

/// Proof carried by the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// Sentinel `previous_hash` of the genesis block (not a real digest).
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Amount paid by the reward transaction of every mined block.
pub const BASE_REWARD: u64 = 1;
