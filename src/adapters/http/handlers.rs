//! Dashboard API handlers.
//!
//! Each handler delegates to the `TradeOrchestrator` and shapes its result
//! into the dashboard's JSON envelopes. Metrics are recorded here so the
//! use cases stay free of infrastructure concerns.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use super::error::ApiError;
use super::export::entries_to_csv;
use super::AppState;
use crate::domain::request::{BridgeRequest, TradeRequest};
use crate::usecases::{Balances, TradeError, TradeOutcome};

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct DryRunQuery {
    dry: Option<String>,
}

impl DryRunQuery {
    fn is_dry_run(&self) -> bool {
        matches!(self.dry.as_deref(), Some("true" | "1"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PriceQuery {
    chain: Option<String>,
    token: Option<String>,
}

/// `POST /api/trade`
#[instrument(skip_all)]
pub async fn record_trade(
    State(state): State<AppState>,
    payload: Result<Json<TradeRequest>, JsonRejection>,
) -> ApiResult {
    let started = Instant::now();
    let Json(request) = payload?;
    let trade = state.orchestrator.record_trade(&request).await?;
    state.metrics.record_entry("trade", trade.status.as_str());
    state.metrics.observe_latency("trade", started.elapsed());
    Ok(Json(json!({ "ok": true, "trade": trade })))
}

/// `GET /api/trades`
pub async fn list_trades(State(state): State<AppState>) -> Json<Value> {
    let ledger = state.orchestrator.ledger().await;
    Json(json!({ "trades": ledger.entries() }))
}

/// `GET /api/trades/export`
pub async fn export_trades(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let ledger = state.orchestrator.ledger().await;
    let csv = entries_to_csv(ledger.entries()).map_err(|e| ApiError::Export(e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"trades.csv\""),
        ],
        csv,
    ))
}

/// `GET /api/portfolio`
pub async fn portfolio(State(state): State<AppState>) -> Json<Value> {
    let ledger = state.orchestrator.ledger().await;
    Json(json!({ "portfolio": ledger.portfolio() }))
}

/// `POST /api/bridge`
#[instrument(skip_all)]
pub async fn bridge(
    State(state): State<AppState>,
    payload: Result<Json<BridgeRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let transfer = state.orchestrator.record_bridge(&request).await?;
    state.metrics.record_entry("bridge", &transfer.status);
    Ok(Json(json!({ "ok": true, "tx": transfer })))
}

/// `GET /api/recall/balance`
#[instrument(skip_all)]
pub async fn recall_balance(State(state): State<AppState>) -> ApiResult {
    let started = Instant::now();
    let balances = state.orchestrator.balances().await;
    record_venue_read(&state, "balances", &balances);
    state.metrics.observe_latency("recall_balance", started.elapsed());

    let balances = match balances? {
        Balances::Local(portfolio) => json!(portfolio),
        Balances::Remote(body) => body,
    };
    Ok(Json(json!({ "ok": true, "balances": balances })))
}

/// `POST /api/recall/trade[?dry=true|1]`
#[instrument(skip_all)]
pub async fn recall_trade(
    State(state): State<AppState>,
    Query(query): Query<DryRunQuery>,
    payload: Result<Json<TradeRequest>, JsonRejection>,
) -> ApiResult {
    let started = Instant::now();
    let Json(request) = payload?;
    let outcome = state
        .orchestrator
        .execute_trade(&request, query.is_dry_run())
        .await?;

    if let Some(trade) = outcome.trade() {
        state.metrics.record_entry("trade", trade.status.as_str());
    }
    state.metrics.observe_latency("recall_trade", started.elapsed());

    let body = match outcome {
        TradeOutcome::DryRun { payload } => {
            json!({ "ok": true, "dry_run": true, "result": payload })
        }
        TradeOutcome::Simulated(trade) => {
            json!({ "ok": true, "simulated": true, "trade": trade })
        }
        TradeOutcome::Remote { trade, result } => {
            state.metrics.record_venue_call("execute", "success");
            json!({ "ok": true, "trade": trade, "result": result })
        }
        TradeOutcome::Fallback { trade, error } => {
            state.metrics.record_venue_call("execute", error.kind());
            state.metrics.trade_fallbacks.inc();
            json!({
                "ok": true,
                "fallback": true,
                "recall_error": error.to_string(),
                "trade": trade,
            })
        }
    };
    Ok(Json(body))
}

/// `GET /api/recall/price?chain=&token=`
#[instrument(skip_all)]
pub async fn recall_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> ApiResult {
    let price = state
        .orchestrator
        .price(query.chain.as_deref(), query.token.as_deref())
        .await;
    record_venue_read(&state, "price", &price);
    Ok(Json(json!({ "ok": true, "price": price? })))
}

fn record_venue_read<T>(state: &AppState, operation: &str, result: &Result<T, TradeError>) {
    if !state.orchestrator.venue_configured() {
        return;
    }
    match result {
        Ok(_) => state.metrics.record_venue_call(operation, "success"),
        Err(TradeError::Venue(e)) => state.metrics.record_venue_call(operation, e.kind()),
        Err(_) => {}
    }
}
