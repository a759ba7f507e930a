use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A value transfer waiting in the pending buffer or sealed into a block.
///
/// Nothing about the parties or the amount is checked: any sender, recipient
/// and numeric amount is accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    /// Kept as a JSON number so `1` and `1.0` hash differently, the same way
    /// they are written on the wire.
    pub amount: Number,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: Number) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Block subsidy paid to `recipient`. The sender `"0"` marks newly minted coins.
    pub fn reward(recipient: impl Into<String>, amount: Number) -> Self {
        Self::new(super::REWARD_SENDER, recipient, amount)
    }
}
