use crate::config::ConfigError;
use crate::pricing::QuoteInputError;
use crate::sheet::{FareSheetError, SheetLookupError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Quote(QuoteInputError),
    Sheet(FareSheetError),
    Lookup(SheetLookupError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Quote(err) => write!(f, "invalid fare inputs: {}", err),
            AppError::Sheet(err) => write!(f, "error loading sheet: {}", err),
            AppError::Lookup(err) => write!(f, "selection error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Quote(err) => Some(err),
            AppError::Sheet(err) => Some(err),
            AppError::Lookup(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Sheet(_) => StatusCode::BAD_REQUEST,
            AppError::Lookup(_) => StatusCode::NOT_FOUND,
            AppError::Quote(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<QuoteInputError> for AppError {
    fn from(value: QuoteInputError) -> Self {
        Self::Quote(value)
    }
}

impl From<FareSheetError> for AppError {
    fn from(value: FareSheetError) -> Self {
        Self::Sheet(value)
    }
}

impl From<SheetLookupError> for AppError {
    fn from(value: SheetLookupError) -> Self {
        Self::Lookup(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_map_to_client_statuses() {
        let lookup = AppError::from(SheetLookupError::NotFound {
            operator: "Zing Bus".to_string(),
            service_id: "9".to_string(),
        });
        assert_eq!(lookup.into_response().status(), StatusCode::NOT_FOUND);

        let sheet = AppError::from(FareSheetError::Empty);
        assert_eq!(sheet.to_string(), "error loading sheet: no data found in sheet");
        assert_eq!(sheet.into_response().status(), StatusCode::BAD_REQUEST);

        let quote = AppError::from(QuoteInputError::NotFinite {
            field: "current_fare",
        });
        assert_eq!(
            quote.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
