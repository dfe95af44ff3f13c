// Mistake book handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::{
    db::Database,
    error::ApiError,
    extract::JsonOrForm,
    models::CreateMistakeRequest,
};

/// Add a word to a user's mistake book.
/// 201 when new, 200 when the word was already there.
/// POST /api/mistakes
pub async fn add_mistake(
    State(db): State<Arc<Database>>,
    JsonOrForm(request): JsonOrForm<CreateMistakeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (record, created) = db.add_mistake(request).await?;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(record)))
}

/// GET /api/mistakes/:user_id
pub async fn list_mistakes(
    State(db): State<Arc<Database>>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mistakes = db.list_mistakes(user_id).await?;

    info!("Retrieved {} mistake book entries for user {}", mistakes.len(), user_id);
    Ok((StatusCode::OK, Json(mistakes)))
}

/// DELETE /api/mistakes/:id
pub async fn delete_mistake(
    State(db): State<Arc<Database>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    db.delete_mistake(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
