use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use serde_json::Number;
use uuid::Uuid;

use crate::blockchain::{BASE_REWARD, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

/// Node settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Recipient of mining rewards.
    pub node_id: String,
    pub difficulty: usize,
    pub reward: Number,
    pub peer_timeout: Duration,
    /// Path of the chain endpoint on peers.
    pub peer_chain_path: String,
    /// Peers registered at startup.
    pub bootstrap_peers: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            node_id: new_node_id(),
            difficulty: DEFAULT_DIFFICULTY,
            reward: Number::from(BASE_REWARD),
            peer_timeout: Duration::from_secs(5),
            peer_chain_path: "/get_chain".to_string(),
            bootstrap_peers: Vec::new(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(host) = var("HOST") {
            config.host = host;
        }
        if let Some(port) = parsed(var("PORT"), "PORT") {
            config.port = port;
        }
        if let Some(id) = var("NODE_ID") {
            config.node_id = id;
        }
        if let Some(difficulty) = parsed::<usize>(var("MINING_DIFFICULTY"), "MINING_DIFFICULTY") {
            if difficulty <= MAX_DIFFICULTY {
                config.difficulty = difficulty;
            } else {
                warn!("MINING_DIFFICULTY={difficulty} exceeds {MAX_DIFFICULTY}, using default");
            }
        }
        if let Some(reward) = parsed(var("MINING_REWARD"), "MINING_REWARD") {
            config.reward = reward;
        }
        if let Some(secs) = parsed(var("PEER_TIMEOUT_SECS"), "PEER_TIMEOUT_SECS") {
            config.peer_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = var("PEER_CHAIN_PATH") {
            config.peer_chain_path = path;
        }
        if let Some(peers) = var("PEERS") {
            config.bootstrap_peers = peers
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }

        config
    }
}

fn parsed<T: FromStr>(value: Option<String>, key: &str) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring malformed {key}={value:?}");
            None
        }
    }
}

/// Random identifier without dashes, e.g. `3f2b...`.
fn new_node_id() -> String {
    Uuid::new_v4().simple().to_string()
}
