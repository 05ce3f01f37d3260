//! REST routes for currency conversion.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;

use crate::core::{ConversionError, ConversionRequest, ConversionResult, RateTable, convert};

/// Shared handler state. The table is never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub rates: Arc<RateTable>,
}

impl IntoResponse for ConversionError {
    fn into_response(self) -> Response {
        let status = match self {
            ConversionError::UnsupportedPair { .. } => StatusCode::BAD_REQUEST,
            ConversionError::InternalFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Build REST routes with the given application state.
pub fn rest_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/currency/convert", post(convert_handler))
        .with_state(state)
}

async fn convert_handler(
    State(state): State<AppState>,
    Json(request): Json<ConversionRequest>,
) -> Result<Json<ConversionResult>, ConversionError> {
    convert(&state.rates, &request).map(Json)
}
