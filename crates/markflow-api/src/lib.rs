//! Markflow API - REST API server
//!
//! This crate provides the REST API for Markflow: the page analyzer
//! endpoint, template CRUD, generation endpoints, and health checks.

pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::create_openapi_routes;
pub use routes::create_router;
pub use state::AppState;
