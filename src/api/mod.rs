mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::ServiceConfig;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::get_chain)
        .service(chain::validate_chain)
        .service(chain::mine_block)
        .service(tx::post_transaction)
        .service(tx::get_pending)
        .service(nodes::register_nodes)
        .service(nodes::resolve_nodes);
}

#[cfg(test)]
mod tests {
    use super::{AppState, init_routes};
    use crate::blockchain::ProofOfWork;
    use crate::consensus::HttpChainFetcher;
    use crate::node::Node;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Number, Value, json};
    use std::time::Duration;

    fn state() -> web::Data<AppState> {
        let node = Node::new("node-a", ProofOfWork::new(1), Number::from(1));
        let fetcher = HttpChainFetcher::new(Duration::from_millis(300), "/get_chain").unwrap();
        web::Data::new(AppState::new(node, fetcher))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(init_routes)).await
        };
    }

    #[actix_web::test]
    async fn genesis_chain_is_served_and_valid() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/get_chain").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["length"], 1);
        assert_eq!(body["chain"][0]["previous_hash"], "1");
        assert_eq!(body["chain"][0]["proof"], 100);

        let req = test::TestRequest::get().uri("/is_valid").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["valid"], true);
    }

    #[actix_web::test]
    async fn transaction_then_mine() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/transactions/new")
            .set_json(json!({"sender": "alice", "recipient": "bob", "amount": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["index"], 2);

        let req = test::TestRequest::get().uri("/pending").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["size"], 1);

        let req = test::TestRequest::get().uri("/mine").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["index"], 2);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(body["transactions"][1]["sender"], "0");
        assert_eq!(body["transactions"][1]["recipient"], "node-a");

        let snap = state.node.chain();
        assert_eq!(snap.length, 2);
        assert_eq!(body["previous_hash"], snap.chain[0].hash());
        assert!(state.node.pending().is_empty());
    }

    #[actix_web::test]
    async fn missing_transaction_field_is_a_client_error() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/transactions/new")
            .set_json(json!({"sender": "alice", "amount": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.node.pending().is_empty());
    }

    #[actix_web::test]
    async fn register_nodes_is_idempotent() {
        let state = state();
        let app = app!(state);

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/nodes/register")
                .set_json(json!({"nodes": ["http://127.0.0.1:5002", "127.0.0.1:5002"]}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["total_nodes"], json!(["127.0.0.1:5002"]));
        }
    }

    #[actix_web::test]
    async fn register_rejects_bad_input() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/nodes/register")
            .set_json(json!({"peers": []}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/nodes/register")
            .set_json(json!({"nodes": ["127.0.0.1:5002", "http://"]}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
        assert!(state.node.peers().is_empty());
    }

    #[actix_web::test]
    async fn resolve_with_unreachable_peer_keeps_chain() {
        let state = state();
        state.node.register_peers(&["127.0.0.1:9"]).unwrap();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/nodes/resolve").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["replaced"], false);
        assert_eq!(body["length"], 1);
    }

    #[actix_web::test]
    async fn health_responds() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/health").to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }
}
