//! Template CRUD handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use markflow_common::types::TemplateMetrics;
use markflow_storage::models::{CreateTemplate, EmailTemplate, UpdateTemplate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{error_response, validation_error, ErrorResponse};
use crate::state::AppState;

/// Query parameters for listing templates
#[derive(Debug, Deserialize)]
pub struct ListTemplatesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Template list response
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub data: Vec<TemplateResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Template response with decoded tags and metrics
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub id: String,
    pub client_id: String,
    pub title: String,
    pub subject: String,
    pub content: String,
    pub status: String,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub metrics: TemplateMetrics,
    pub created_at: DateTime<Utc>,
}

impl From<EmailTemplate> for TemplateResponse {
    fn from(t: EmailTemplate) -> Self {
        let tags = t.tags_vec();
        let metrics = t.metrics();
        Self {
            id: t.id,
            client_id: t.client_id,
            title: t.title,
            subject: t.subject,
            content: t.content,
            status: t.status,
            scheduled_for: t.scheduled_for,
            tags,
            metrics,
            created_at: t.created_at,
        }
    }
}

/// Request body for manually creating a template
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub title: String,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// List templates for a client, most recent first
///
/// GET /api/v1/clients/:client_id/templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    Query(query): Query<ListTemplatesQuery>,
) -> Result<Json<TemplateListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let templates = state
        .store
        .list(&client_id, query.limit, query.offset)
        .await
        .map_err(|e| error_response(&e))?;

    let total = state.store.count(&client_id).await.unwrap_or(0);

    Ok(Json(TemplateListResponse {
        data: templates.into_iter().map(TemplateResponse::from).collect(),
        total,
        limit: query.limit,
        offset: query.offset,
    }))
}

/// Manually create a template
///
/// POST /api/v1/clients/:client_id/templates
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    Json(input): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateResponse>), (StatusCode, Json<ErrorResponse>)> {
    if input.title.trim().is_empty() {
        return Err(validation_error("Title is required"));
    }
    if input.subject.trim().is_empty() {
        return Err(validation_error("Subject is required"));
    }
    if input.content.trim().is_empty() {
        return Err(validation_error("Content is required"));
    }

    let template = CreateTemplate {
        client_id: client_id.clone(),
        title: input.title,
        subject: input.subject,
        content: input.content,
        tags: input.tags,
    }
    .into_template();

    state
        .store
        .save(&template)
        .await
        .map_err(|e| error_response(&e))?;

    info!(template_id = %template.id, client_id, "Created template");

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(template))))
}

/// Get a single template
///
/// GET /api/v1/clients/:client_id/templates/:id
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path((client_id, id)): Path<(String, String)>,
) -> Result<Json<TemplateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let template = state
        .store
        .get(&client_id, &id)
        .await
        .map_err(|e| error_response(&e))?
        .ok_or_else(|| {
            error_response(&markflow_common::Error::NotFound(format!(
                "Template {} not found",
                id
            )))
        })?;

    Ok(Json(TemplateResponse::from(template)))
}

/// Update a template; absent fields are left unchanged
///
/// PATCH /api/v1/clients/:client_id/templates/:id
pub async fn update_template(
    State(state): State<Arc<AppState>>,
    Path((client_id, id)): Path<(String, String)>,
    Json(input): Json<UpdateTemplate>,
) -> Result<Json<TemplateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let updated = state
        .store
        .update(&client_id, &id, &input)
        .await
        .map_err(|e| error_response(&e))?;

    info!(template_id = %id, client_id, "Updated template");

    Ok(Json(TemplateResponse::from(updated)))
}

/// Delete a template
///
/// DELETE /api/v1/clients/:client_id/templates/:id
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path((client_id, id)): Path<(String, String)>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let deleted = state
        .store
        .delete(&client_id, &id)
        .await
        .map_err(|e| error_response(&e))?;

    if !deleted {
        return Err(error_response(&markflow_common::Error::NotFound(format!(
            "Template {} not found",
            id
        ))));
    }

    info!(template_id = %id, client_id, "Deleted template");

    Ok(StatusCode::NO_CONTENT)
}
