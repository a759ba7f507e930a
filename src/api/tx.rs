use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, NewTxResponse, PendingResponse};
use crate::transaction::Transaction;

/// Queue a transaction for the next mined block. All three fields are
/// required; their values are not checked.
#[post("/transactions/new")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<Transaction>,
) -> HttpResponse {
    let tx = body.into_inner();
    let (sender, recipient) = (tx.sender.clone(), tx.recipient.clone());
    let index = state.node.submit_transaction(tx);
    info!("POST /transactions/new - {sender} -> {recipient} queued for block #{index}");

    HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to block {index}"),
        index,
    })
}

/// List transactions waiting for the next block.
#[get("/pending")]
pub async fn get_pending(state: web::Data<AppState>) -> HttpResponse {
    let transactions = state.node.pending();
    HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    })
}
