//! Venue Client Tests - RecallClient Against a Local Stub
//!
//! Spins up a throwaway axum server on 127.0.0.1:0 standing in for the
//! Recall API and checks decoding, rejection, transport failure and auth.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use recall_dashboard::adapters::api::{RecallClient, RecallClientConfig};
use recall_dashboard::config::VenuePaths;
use recall_dashboard::ports::execution::{ExecutionResult, Quote, TradingVenue, VenueError};

#[derive(Clone, Default)]
struct StubState {
    calls: Arc<AtomicUsize>,
}

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String, api_key: Option<&str>, timeout: Duration) -> RecallClient {
    RecallClient::new(RecallClientConfig {
        base_url,
        api_key: api_key.map(str::to_string),
        timeout,
        paths: VenuePaths::default(),
    })
    .unwrap()
}

fn payload() -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("fromToken".to_string(), json!("0xusdc"));
    payload.insert("toToken".to_string(), json!("0xeth"));
    payload.insert("amount".to_string(), json!("10"));
    payload
}

#[tokio::test]
async fn test_execute_success_merges_quote_and_sends_bearer() {
    let app = Router::new().route(
        "/api/trade/execute",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({
                "success": true,
                "auth": auth,
                "echo": body,
                "transaction": {"id": "tx-1", "status": "completed"}
            }))
        }),
    );
    let base = spawn_stub(app).await;
    let venue = client(base, Some("secret-key"), Duration::from_secs(5));

    let quote = Quote { data: json!({"price": "3000"}) };
    let ExecutionResult::Success(body) = venue.execute(&payload(), Some(quote)).await else {
        panic!("expected success");
    };
    assert_eq!(body["auth"], "Bearer secret-key");
    assert_eq!(body["echo"]["toToken"], "0xeth");
    assert_eq!(body["echo"]["quote"]["price"], "3000");
    assert_eq!(body["transaction"]["id"], "tx-1");
}

#[tokio::test]
async fn test_non_2xx_is_rejected_with_status_and_body() {
    let app = Router::new().route(
        "/api/trade/execute",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "unknown token"}))) }),
    );
    let base = spawn_stub(app).await;
    let venue = client(base, None, Duration::from_secs(5));

    let ExecutionResult::Failure(error) = venue.execute(&payload(), None).await else {
        panic!("expected failure");
    };
    assert_eq!(error.status(), Some(400));
    let VenueError::Rejected { body, .. } = error else {
        panic!("expected rejection");
    };
    assert!(body.contains("unknown token"));
}

#[tokio::test]
async fn test_success_false_body_is_rejected() {
    let app = Router::new().route(
        "/api/trade/execute",
        post(|| async { Json(json!({"success": false, "error": "insufficient balance"})) }),
    );
    let base = spawn_stub(app).await;
    let venue = client(base, None, Duration::from_secs(5));

    let ExecutionResult::Failure(error) = venue.execute(&payload(), None).await else {
        panic!("expected failure");
    };
    assert_eq!(error.kind(), "rejected");
    assert_eq!(error.status(), Some(200));
}

#[tokio::test]
async fn test_unreachable_venue_is_transport_failure() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let venue = client(format!("http://{addr}"), None, Duration::from_secs(2));
    let ExecutionResult::Failure(error) = venue.execute(&payload(), None).await else {
        panic!("expected failure");
    };
    assert_eq!(error.kind(), "transport");
    assert_eq!(error.status(), None);
}

#[tokio::test]
async fn test_slow_venue_times_out_after_one_fallback_attempt() {
    let state = StubState::default();
    let app = Router::new()
        .route(
            "/api/trade/execute",
            post(|State(state): State<StubState>| async move {
                state.calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"success": true}))
            }),
        )
        .with_state(state.clone());
    let base = spawn_stub(app).await;
    let venue = client(base, None, Duration::from_millis(200));

    let ExecutionResult::Failure(error) = venue.execute(&payload(), None).await else {
        panic!("expected failure");
    };
    assert_eq!(error.kind(), "transport");
    assert_eq!(state.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_quote_failure_is_none_and_success_uses_query() {
    let app = Router::new().route(
        "/api/trade/quote",
        get(|Query(params): Query<std::collections::HashMap<String, String>>| async move {
            if params.get("fromToken").map(String::as_str) == Some("0xusdc") {
                (StatusCode::OK, Json(json!({"price": "1.0", "amount": params["amount"]})))
            } else {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"error": "bad pair"})))
            }
        }),
    );
    let base = spawn_stub(app).await;
    let venue = client(base, None, Duration::from_secs(5));

    let quote = venue.quote(&payload()).await.unwrap();
    assert_eq!(quote.data["amount"], "10");

    let mut bad = payload();
    bad.insert("fromToken".to_string(), json!("0xnope"));
    assert!(venue.quote(&bad).await.is_none());
}

#[tokio::test]
async fn test_balances_and_price_reads() {
    let app = Router::new()
        .route(
            "/api/agent/balances",
            get(|| async { Json(json!({"success": true, "balances": [{"symbol": "USDC"}]})) }),
        )
        .route(
            "/api/price",
            get(|Query(params): Query<std::collections::HashMap<String, String>>| async move {
                Json(json!({"token": params["token"], "chain": params["chain"], "price": 1.0}))
            }),
        );
    let base = spawn_stub(app).await;
    let venue = client(base, None, Duration::from_secs(5));

    let balances = venue.balances().await.unwrap();
    assert_eq!(balances["balances"][0]["symbol"], "USDC");

    let price = venue.price("evm", "0xeth").await.unwrap();
    assert_eq!(price["token"], "0xeth");
    assert_eq!(price["chain"], "evm");
}
