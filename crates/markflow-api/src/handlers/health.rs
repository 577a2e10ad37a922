//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// Basic health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: String,
}

/// Detailed health response with component checks
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall health status
    pub status: String,
    /// Individual component health checks
    pub checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    /// Database health status
    pub database: ComponentHealth,
}

/// Individual component health status
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component status (healthy/unhealthy/not_configured)
    pub status: String,
    /// Response latency in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Basic health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Liveness check (is the process running)
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness check (is the service ready to accept requests).
///
/// A cache-only deployment has no database to check and is always ready.
pub async fn readiness(State(state): State<Arc<AppState>>) -> Result<StatusCode, StatusCode> {
    if let Some(db) = &state.db_pool {
        db.health_check()
            .await
            .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    }

    Ok(StatusCode::OK)
}

/// Detailed health check with all dependencies
pub async fn health_detailed(State(state): State<Arc<AppState>>) -> Json<DetailedHealthResponse> {
    let db_status = match &state.db_pool {
        Some(db) => {
            let start = std::time::Instant::now();
            match db.health_check().await {
                Ok(_) => ComponentHealth {
                    status: "healthy".to_string(),
                    latency_ms: Some(start.elapsed().as_millis() as u64),
                    error: None,
                },
                Err(e) => ComponentHealth {
                    status: "unhealthy".to_string(),
                    latency_ms: None,
                    error: Some(e.to_string()),
                },
            }
        }
        None => ComponentHealth {
            status: "not_configured".to_string(),
            latency_ms: None,
            error: None,
        },
    };

    let overall_status = if db_status.status == "unhealthy" {
        "unhealthy"
    } else {
        "healthy"
    };

    Json(DetailedHealthResponse {
        status: overall_status.to_string(),
        checks: HealthChecks {
            database: db_status,
        },
    })
}
