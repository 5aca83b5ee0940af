//! Reports API endpoints - JSON API

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tally_core::{ReportKind, ReportStatus};

use crate::{ApiError, AppState};

/// Reply to a generation request
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub message: &'static str,
}

/// State of a single report
#[derive(Debug, Serialize)]
pub struct ReportStateResponse {
    pub report: &'static str,
    pub state: String,
}

/// Start all report jobs without waiting for them
pub async fn api_reports_generate(
    State(state): State<AppState>,
) -> (StatusCode, Json<GenerateResponse>) {
    // The background task logs its own completion and failures
    drop(state.reports.start_generation());
    (
        StatusCode::CREATED,
        Json(GenerateResponse {
            message: "processing started",
        }),
    )
}

/// State of every report, keyed by output file name
pub async fn api_reports_status(State(state): State<AppState>) -> Json<ReportStatus> {
    Json(state.reports.status())
}

/// State of one report, by job name or output file name
pub async fn api_report_state(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ReportStateResponse>, ApiError> {
    let kind: ReportKind = name
        .parse()
        .map_err(|_| ApiError::NotFound { resource: format!("report '{}'", name) })?;
    Ok(Json(ReportStateResponse {
        report: kind.output_filename(),
        state: state.reports.state(kind).to_string(),
    }))
}
