//! Dashboard summary endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use aggregator::{DashboardSummary, RangePreset};

use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub winery_id: String,
    /// Range preset, defaults to "30days".
    pub range: Option<String>,
}

/// GET /summary?wineryId=...&range=30days
pub async fn summary_handler(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<DashboardSummary>, ApiError> {
    if query.winery_id.is_empty() {
        return Err(ApiError::bad_request("wineryId must not be empty"));
    }

    let preset = match query.range.as_deref() {
        Some(raw) => RangePreset::parse(raw)?,
        None => RangePreset::ThirtyDays,
    };

    let summary = state.summaries.build(&query.winery_id, preset).await?;
    Ok(Json(summary))
}
