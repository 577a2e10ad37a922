//! Page analyzer handler

use axum::{extract::State, http::StatusCode, Json};
use markflow_core::analyzer::AnalysisReport;
use serde::Deserialize;
use std::sync::Arc;

use crate::handlers::{error_response, validation_error, ErrorResponse};
use crate::state::AppState;

/// Request body for page analysis
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: String,
}

/// Analyze a page for on-page SEO facts
///
/// POST /api/v1/analyze
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(input): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, (StatusCode, Json<ErrorResponse>)> {
    if input.url.trim().is_empty() {
        return Err(validation_error("URL is required"));
    }

    let report = state
        .analyzer
        .analyze(&input.url)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(report))
}
