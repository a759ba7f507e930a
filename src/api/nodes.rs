use actix_web::{HttpResponse, get, post, web};
use log::{info, warn};

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::error::NodeError;

/// Register a list of peer addresses. Rejects the whole request if any
/// address is malformed.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse, NodeError> {
    let Some(nodes) = body.into_inner().nodes else {
        warn!("POST /nodes/register - rejected: no node list");
        return Ok(HttpResponse::BadRequest().body("Error: please supply a valid list of nodes"));
    };

    let total_nodes = state.node.register_peers(&nodes)?;
    info!(
        "POST /nodes/register - {} submitted, {} known",
        nodes.len(),
        total_nodes.len()
    );

    Ok(HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added".to_string(),
        total_nodes,
    }))
}

/// Run consensus against every registered peer.
#[get("/nodes/resolve")]
pub async fn resolve_nodes(state: web::Data<AppState>) -> HttpResponse {
    let (replaced, snapshot) = state.node.resolve_consensus(&state.resolver).await;
    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    HttpResponse::Ok().json(ResolveResponse {
        message: message.to_string(),
        replaced,
        chain: snapshot.chain,
        length: snapshot.length,
    })
}
