// Handlers module
// HTTP handlers for the REST API

pub mod auth;
mod files;
pub mod forum;
pub mod mistakes;
pub mod resources;
pub mod suggestions;
pub mod words;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::{db::Database, error::ApiError};

/// Health check handler
/// Returns "OK" with 200 status without touching the database
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Database health check
/// GET /health/db
pub async fn database_health(
    State(db): State<Arc<Database>>,
) -> Result<impl IntoResponse, ApiError> {
    db.health_check().await?;

    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))))
}
