use std::collections::HashSet;

use log::info;
use url::Url;

use crate::error::NodeError;

/// Set of known peers, stored as normalized `host[:port]` strings.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add several peers at once. Nothing is inserted unless every address
    /// is valid. Returns how many were new.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<usize, NodeError> {
        let normalized = addresses
            .iter()
            .map(|a| normalize_address(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut added = 0;
        for peer in normalized {
            if self.peers.insert(peer.clone()) {
                info!("registered peer {peer}");
                added += 1;
            }
        }
        Ok(added)
    }

    /// Known peers in lexical order.
    pub fn list(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.peers.iter().cloned().collect();
        peers.sort();
        peers
    }
}

/// Reduce a peer address to `host[:port]`.
///
/// Accepts full URLs (`http://10.0.0.5:5000/`), bare `host:port` and bare
/// hosts. Scheme, credentials, path and a port equal to the scheme's default
/// are dropped; the host is lowercased.
pub fn normalize_address(address: &str) -> Result<String, NodeError> {
    let invalid = || NodeError::InvalidPeerAddress(address.to_string());

    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|_| invalid())?;
    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
