// Forum handlers: announcements and the daily quote

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
    extract::{AdminSession, JsonOrForm},
    models::{CreatePostRequest, UpdateQuoteRequest},
};

/// List all posts, newest first
/// GET /api/forum/posts
pub async fn list_posts(
    State(db): State<Arc<Database>>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = db.list_posts().await?;

    info!("Retrieved {} posts", posts.len());
    Ok((StatusCode::OK, Json(posts)))
}

/// Publish a post
/// POST /api/forum/posts
pub async fn create_post(
    State(db): State<Arc<Database>>,
    AdminSession(admin): AdminSession,
    JsonOrForm(request): JsonOrForm<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = db.create_post(request, &admin.username).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// DELETE /api/forum/posts/:id
pub async fn delete_post(
    State(db): State<Arc<Database>>,
    AdminSession(_admin): AdminSession,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    db.delete_post(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/forum/quote
pub async fn get_quote(
    State(db): State<Arc<Database>>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = db.get_quote().await?;

    Ok((StatusCode::OK, Json(quote)))
}

/// PUT /api/forum/quote
pub async fn update_quote(
    State(db): State<Arc<Database>>,
    AdminSession(admin): AdminSession,
    JsonOrForm(request): JsonOrForm<UpdateQuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Quote updated by {}", admin.username);

    let quote = db.update_quote(request).await?;

    Ok((StatusCode::OK, Json(quote)))
}
