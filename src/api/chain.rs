use actix_web::{HttpResponse, get, web};

use super::models::{AppState, MineResponse, ValidateResponse};
use crate::error::NodeError;

/// Get the full blockchain.
#[get("/get_chain")]
pub async fn get_chain(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.node.chain())
}

/// Validate the whole local chain.
#[get("/is_valid")]
pub async fn validate_chain(state: web::Data<AppState>) -> HttpResponse {
    let valid = state.node.is_valid();
    let message = if valid {
        "The blockchain is valid."
    } else {
        "The blockchain is NOT valid."
    };
    HttpResponse::Ok().json(ValidateResponse {
        message: message.to_string(),
        valid,
    })
}

/// Mine a new block:
/// - Solve the proof-of-work for the current tip (on the blocking pool)
/// - Reward this node with a transaction from "0"
/// - Seal every pending transaction into the new block
#[get("/mine")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, NodeError> {
    let worker = state.clone();
    let block = web::block(move || worker.node.mine())
        .await
        .map_err(|e| NodeError::BlockingPool(e.to_string()))??;

    Ok(HttpResponse::Ok().json(MineResponse {
        message: "New block forged".to_string(),
        block,
    }))
}
