//! Generation handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use markflow_common::types::GenerationOptions;
use markflow_core::layout::TemplateKind;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::handlers::templates::TemplateResponse;
use crate::handlers::{error_response, validation_error, ErrorResponse};
use crate::state::AppState;

/// Request body for batch generation
#[derive(Debug, Deserialize)]
pub struct GenerateBatchRequest {
    #[serde(flatten)]
    pub options: GenerationOptions,
    /// Layout kind; unknown values fall back to `simple`
    #[serde(default)]
    pub template_kind: Option<String>,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub theme: Option<String>,
}

fn default_count() -> usize {
    3
}

/// Request body for custom-content enhancement
#[derive(Debug, Deserialize)]
pub struct GenerateCustomRequest {
    #[serde(flatten)]
    pub options: GenerationOptions,
    pub content: String,
}

/// Request body for a personal-touch note
#[derive(Debug, Deserialize)]
pub struct GeneratePersonalRequest {
    #[serde(flatten)]
    pub options: GenerationOptions,
}

/// Request body for an AI edit of an existing template
#[derive(Debug, Deserialize)]
pub struct EditTemplateRequest {
    pub instructions: String,
}

/// Batch response
#[derive(Debug, serde::Serialize)]
pub struct GenerateBatchResponse {
    pub data: Vec<TemplateResponse>,
}

fn validate_options(options: &GenerationOptions) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    if options.client_name.trim().is_empty() {
        return Err(validation_error("Client name is required"));
    }
    if options.purpose.trim().is_empty() {
        return Err(validation_error("Purpose is required"));
    }
    Ok(())
}

/// Generate a batch of templates
///
/// POST /api/v1/clients/:client_id/generate
pub async fn generate_batch(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    Json(mut input): Json<GenerateBatchRequest>,
) -> Result<(StatusCode, Json<GenerateBatchResponse>), (StatusCode, Json<ErrorResponse>)> {
    input.options.client_id = client_id;
    validate_options(&input.options)?;

    let kind = TemplateKind::parse(input.template_kind.as_deref().unwrap_or("simple"));
    let templates = state
        .synthesizer
        .generate_batch(&input.options, kind, input.count, input.theme.as_deref())
        .await
        .map_err(|e| error_response(&e))?;

    info!(
        client_id = %input.options.client_id,
        count = templates.len(),
        "Generated template batch"
    );

    Ok((
        StatusCode::CREATED,
        Json(GenerateBatchResponse {
            data: templates.into_iter().map(TemplateResponse::from).collect(),
        }),
    ))
}

/// Enhance caller-supplied content into a polished template
///
/// POST /api/v1/clients/:client_id/generate/custom
pub async fn generate_custom(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    Json(mut input): Json<GenerateCustomRequest>,
) -> Result<(StatusCode, Json<TemplateResponse>), (StatusCode, Json<ErrorResponse>)> {
    input.options.client_id = client_id;
    validate_options(&input.options)?;
    if input.content.trim().is_empty() {
        return Err(validation_error("Content is required"));
    }

    let template = state
        .synthesizer
        .enhance_custom(&input.options, &input.content)
        .await
        .map_err(|e| error_response(&e))?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(template))))
}

/// Generate a short personal-sounding note
///
/// POST /api/v1/clients/:client_id/generate/personal
pub async fn generate_personal(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    Json(mut input): Json<GeneratePersonalRequest>,
) -> Result<(StatusCode, Json<TemplateResponse>), (StatusCode, Json<ErrorResponse>)> {
    input.options.client_id = client_id;
    validate_options(&input.options)?;

    let template = state
        .synthesizer
        .personal_touch(&input.options)
        .await
        .map_err(|e| error_response(&e))?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(template))))
}

/// AI-edit an existing template
///
/// POST /api/v1/clients/:client_id/templates/:id/edit
pub async fn edit_template(
    State(state): State<Arc<AppState>>,
    Path((client_id, id)): Path<(String, String)>,
    Json(input): Json<EditTemplateRequest>,
) -> Result<Json<TemplateResponse>, (StatusCode, Json<ErrorResponse>)> {
    if input.instructions.trim().is_empty() {
        return Err(validation_error("Instructions are required"));
    }

    let template = state
        .synthesizer
        .edit_template(&client_id, &id, &input.instructions)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(TemplateResponse::from(template)))
}
