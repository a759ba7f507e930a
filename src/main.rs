mod api;
mod blockchain;
mod config;
mod consensus;
mod error;
mod node;
mod transaction;

use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use config::NodeConfig;
use consensus::HttpChainFetcher;
use node::Node;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    let node = Node::from_config(&config).map_err(std::io::Error::other)?;
    let fetcher = HttpChainFetcher::new(config.peer_timeout, &config.peer_chain_path)
        .map_err(std::io::Error::other)?;

    info!(
        "⛓️ Starting ledger node {} at http://{}:{} (difficulty={}, peers={})",
        node.node_id(),
        config.host,
        config.port,
        config.difficulty,
        node.peers().len()
    );

    let state = web::Data::new(AppState::new(node, fetcher));
    let server_state = state.clone();

    let result = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(server_state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    // Let blocking workers still searching for a proof exit.
    state.node.cancel_mining();
    result
}
