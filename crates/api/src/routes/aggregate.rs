//! Manual aggregation trigger endpoint.

use axum::{body::Bytes, extract::State, Json};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use aggregator::WineryFailure;

use crate::response::ApiError;
use crate::state::AppState;

/// Request body for POST /aggregate. Both fields optional; an absent or
/// empty body aggregates yesterday for all wineries.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequest {
    pub date: Option<NaiveDate>,
    pub winery_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    /// True when the invocation itself completed. Wineries that failed
    /// mid-run are itemized in `failures`, not reflected here.
    pub success: bool,
    pub message: String,
    pub date: NaiveDate,
    pub events_seen: usize,
    pub events_rejected: usize,
    pub wineries_processed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<WineryFailure>,
    pub truncated: bool,
}

/// POST /aggregate - Runs aggregation for one UTC day.
///
/// The body is parsed by hand: an empty body means "use the defaults",
/// but a body that is present and malformed is a 400, never silently
/// treated as absent.
pub async fn aggregate_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AggregateResponse>, ApiError> {
    let request: AggregateRequest = if body.is_empty() {
        AggregateRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("invalid request body: {}", e)))?
    };

    // Defaults to yesterday so the hourly worker and the manual trigger
    // line up on the same day.
    let date = request
        .date
        .unwrap_or_else(|| Utc::now().date_naive() - Duration::days(1));

    if let Some(ref winery_id) = request.winery_id {
        if winery_id.is_empty() {
            return Err(ApiError::bad_request("wineryId must not be empty"));
        }
    }

    info!(date = %date, winery_id = ?request.winery_id, "Manual aggregation triggered");

    let report = state
        .aggregator
        .aggregate(date, request.winery_id.as_deref())
        .await?;

    Ok(Json(AggregateResponse {
        success: true,
        message: report.message(),
        date: report.date,
        events_seen: report.events_seen,
        events_rejected: report.events_rejected,
        wineries_processed: report.wineries_processed,
        failures: report.failures,
        truncated: report.truncated,
    }))
}
