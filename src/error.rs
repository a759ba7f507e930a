use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors surfaced by the node core.
///
/// Chain and proof validation failures are not errors; they are reported as
/// `false` by the validation functions.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A peer address could not be normalized to `host[:port]`.
    #[error("invalid peer address: {0:?}")]
    InvalidPeerAddress(String),

    /// A peer could not be reached or answered with something unusable.
    /// Consensus logs and skips these.
    #[error("failed to fetch chain from {peer}: {reason}")]
    FetchFailure { peer: String, reason: String },

    /// The block sequence is empty. Unreachable once a chain is constructed.
    #[error("chain has no blocks")]
    EmptyChain,

    /// A proof search was cancelled before it found a solution.
    #[error("mining cancelled")]
    MiningCancelled,

    /// The HTTP client used for peer requests could not be built.
    #[error("http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The blocking thread pool failed to run a task.
    #[error("blocking task failed: {0}")]
    BlockingPool(String),
}

impl NodeError {
    pub fn fetch(peer: &str, reason: impl ToString) -> Self {
        Self::FetchFailure {
            peer: peer.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ResponseError for NodeError {
    fn status_code(&self) -> StatusCode {
        match self {
            NodeError::InvalidPeerAddress(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
