pub mod model;

pub use model::Transaction;

/// Sender used by reward transactions; not a real participant.
pub const REWARD_SENDER: &str = "0";
