//! Call statistics

use axum::extract::State;
use chrono::Utc;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, StatsResponse};
use crate::domain::TodayStats;

/// Number of log entries shown on the dashboard
const RECENT_LIMIT: usize = 20;

/// GET /api/admin/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let entries = state.call_log.entries().await?;
    let today = TodayStats::from_entries(&entries, Utc::now().date_naive());
    let recent = entries.into_iter().rev().take(RECENT_LIMIT).collect();

    Ok(Json(StatsResponse { today, recent }))
}
