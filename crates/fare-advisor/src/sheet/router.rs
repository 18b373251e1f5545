use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{FareSheetRow, OperatorServices};
use super::refresh::SharedSheet;
use crate::pricing::{FareAdvice, FareAdvisor, QuoteInputError};

#[derive(Clone)]
struct SheetRouteState {
    shared: SharedSheet,
    advisor: Arc<FareAdvisor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SheetSelectionQuery {
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SheetCatalogResponse {
    pub loaded_at: DateTime<Utc>,
    pub operators: Vec<OperatorServices>,
}

#[derive(Debug, Serialize)]
pub struct SheetQuoteResponse {
    pub operator: String,
    pub service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub advice: FareAdvice,
}

impl SheetQuoteResponse {
    pub fn for_row(
        advisor: &FareAdvisor,
        row: &FareSheetRow,
        loaded_at: Option<DateTime<Utc>>,
    ) -> Result<Self, QuoteInputError> {
        let advice = advisor.advise(&row.quote_input())?;
        Ok(Self {
            operator: row.operator.clone(),
            service_id: row.service_id.clone(),
            loaded_at,
            advice,
        })
    }
}

/// Router serving lookups against the periodically refreshed fare sheet.
pub fn sheet_router(shared: SharedSheet, advisor: Arc<FareAdvisor>) -> Router {
    Router::new()
        .route("/api/v1/fares/sheet", get(catalog_handler))
        .route("/api/v1/fares/sheet/quote", get(sheet_quote_handler))
        .with_state(SheetRouteState { shared, advisor })
}

fn not_loaded(last_error: Option<&str>) -> Response {
    let payload = json!({
        "error": last_error.unwrap_or("fare sheet not loaded yet"),
    });
    (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
}

async fn catalog_handler(State(state): State<SheetRouteState>) -> Response {
    let guard = state.shared.read().await;
    match guard.snapshot() {
        Some(snapshot) => {
            let body = SheetCatalogResponse {
                loaded_at: snapshot.loaded_at,
                operators: snapshot.sheet.catalog(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        None => not_loaded(guard.last_error()),
    }
}

async fn sheet_quote_handler(
    State(state): State<SheetRouteState>,
    Query(selection): Query<SheetSelectionQuery>,
) -> Response {
    let guard = state.shared.read().await;
    let Some(snapshot) = guard.snapshot() else {
        return not_loaded(guard.last_error());
    };

    let row = match snapshot
        .sheet
        .select(selection.operator.as_deref(), selection.service_id.as_deref())
    {
        Ok(row) => row,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::NOT_FOUND, Json(payload)).into_response();
        }
    };

    match SheetQuoteResponse::for_row(&state.advisor, row, Some(snapshot.loaded_at)) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(error) => {
            let payload = json!({ "error": format!("sheet row rejected: {error}") });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}
