use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::NodeError;

/// A peer's view of its chain, as served by its chain endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Retrieves a remote peer's chain. Failures are reported as
/// [`NodeError::FetchFailure`].
pub trait ChainFetcher {
    fn fetch_chain(&self, peer: &str) -> impl Future<Output = Result<ChainSnapshot, NodeError>>;
}

/// Fetches `GET http://{peer}{path}` with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    client: reqwest::Client,
    path: String,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration, path: &str) -> Result<Self, NodeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Ok(Self { client, path })
    }

    pub fn url_for(&self, peer: &str) -> String {
        format!("http://{peer}{}", self.path)
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, NodeError> {
        let url = self.url_for(peer);
        debug!("fetching chain from {url}");
        let snapshot = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| NodeError::fetch(peer, e))?
            .json::<ChainSnapshot>()
            .await
            .map_err(|e| NodeError::fetch(peer, e))?;
        Ok(snapshot)
    }
}
