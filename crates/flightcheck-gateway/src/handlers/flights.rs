use crate::error::{AppError, Result};
use crate::model::BatchRequest;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use flightcheck_core::{CanonicalFlightCode, FlightResult};
use serde_json::Value;
use tracing::{info, warn};

/// `POST /v1/flights/batch`
///
/// Answers one result per input code, in input order; repeated codes are
/// looked up once and repeated in the response.
///
/// Callers send canonical codes (see `normalize_flight_code`); they are only
/// trimmed here, so each code is echoed back exactly as it was requested.
pub async fn batch_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<FlightResult>>> {
    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejecting unreadable batch body");
        AppError::Validation(format!("request body is not valid JSON: {e}"))
    })?;
    let request = BatchRequest::from_value(value)?;

    let source = state.source().ok_or(AppError::MissingCredentials)?;

    let codes: Vec<CanonicalFlightCode> = request
        .flight_codes
        .iter()
        .map(|code| CanonicalFlightCode::new_unchecked(code.trim()))
        .collect();
    if codes.is_empty() {
        return Ok(Json(Vec::new()));
    }

    info!(codes = codes.len(), date = ?request.date, "resolving flight batch");
    let results = source.lookup(&codes, request.date).await?;

    Ok(Json(results))
}
