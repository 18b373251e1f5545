use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fare_advisor::error::AppError;
use fare_advisor::pricing::{quote_router, FareAdvisor};
use fare_advisor::sheet::router::SheetQuoteResponse;
use fare_advisor::sheet::{sheet_router, InlineCsvSource, SharedSheet, SheetSource};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct InlineSheetQuoteRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) operator: Option<String>,
    #[serde(default)]
    pub(crate) service_id: Option<String>,
}

pub(crate) fn with_fare_routes(advisor: Arc<FareAdvisor>, shared: SharedSheet) -> axum::Router {
    quote_router(advisor.clone())
        .merge(sheet_router(shared, advisor))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/fares/sheet/inline-quote",
            axum::routing::post(inline_sheet_quote_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn inline_sheet_quote_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<InlineSheetQuoteRequest>,
) -> Result<Json<SheetQuoteResponse>, AppError> {
    let InlineSheetQuoteRequest {
        csv,
        operator,
        service_id,
    } = payload;

    let sheet = InlineCsvSource::new(csv).load()?;
    let row = sheet.select(operator.as_deref(), service_id.as_deref())?;
    let body = SheetQuoteResponse::for_row(&state.advisor, row, None)?;

    Ok(Json(body))
}
