use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::domain::FareQuoteInput;
use super::service::FareAdvisor;

/// Router exposing the form-style quote endpoint.
pub fn quote_router(advisor: Arc<FareAdvisor>) -> Router {
    Router::new()
        .route("/api/v1/fares/quote", post(quote_handler))
        .with_state(advisor)
}

pub(crate) async fn quote_handler(
    State(advisor): State<Arc<FareAdvisor>>,
    Json(input): Json<FareQuoteInput>,
) -> Response {
    match advisor.advise(&input) {
        Ok(advice) => (StatusCode::OK, Json(advice)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}
