pub mod fetch;
pub mod peers;
pub mod resolver;

pub use fetch::{ChainFetcher, ChainSnapshot, HttpChainFetcher};
pub use peers::PeerRegistry;
pub use resolver::ConsensusResolver;
