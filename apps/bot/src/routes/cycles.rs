use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::fanout::dispatcher::CycleReport;
use crate::state::AppState;

/// POST /api/v1/cycles
///
/// Runs one delivery cycle now and returns its report.
/// 409 if a scheduled or manual cycle is already running.
pub async fn handle_run_cycle(
    State(state): State<AppState>,
) -> Result<Json<CycleReport>, AppError> {
    let report = state
        .cycles
        .try_run()
        .await
        .ok_or(AppError::CycleInProgress)??;

    Ok(Json(report))
}
