// Suggestion handlers: user submissions and admin feedback

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::path::Path as FsPath;
use std::sync::Arc;
use tracing::info;

use super::files::{attachment_response, read_multipart};
use crate::{
    db::Database,
    error::ApiError,
    extract::{AdminSession, JsonOrForm},
    models::{CreateSuggestionRequest, FeedbackRequest, SuggestionAttachment},
    state::AppState,
    storage::UploadStore,
};

const SUGGESTION_DIR: &str = "suggestions";

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Submit a suggestion
/// POST /api/suggestions (JSON, urlencoded form, or multipart with an optional `file`)
pub async fn submit_suggestion(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, ApiError> {
    let (request, file) = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        let (fields, file) = read_multipart(multipart).await?;
        let request = CreateSuggestionRequest::from_form_fields(fields).map_err(ApiError::Validation)?;
        (request, file)
    } else {
        let JsonOrForm(request) = JsonOrForm::<CreateSuggestionRequest>::from_request(request, &state).await?;
        (request, None)
    };

    request.validate().map_err(ApiError::Validation)?;

    // Browsers send an empty `file` part when nothing was chosen
    let attachment = match file.filter(|f| !f.bytes.is_empty()) {
        Some(file) => {
            let (file_name, file_path) = state.uploads.save(SUGGESTION_DIR, &file.name, &file.bytes).await?;
            Some(SuggestionAttachment { file_name, file_path })
        }
        None => None,
    };
    let stored_path = attachment.as_ref().map(|a| a.file_path.clone());

    let suggestion = match state.db.create_suggestion(request, attachment).await {
        Ok(suggestion) => suggestion,
        Err(e) => {
            if let Some(path) = stored_path {
                state.uploads.remove(&path).await;
            }
            return Err(e);
        }
    };

    Ok((StatusCode::CREATED, Json(suggestion)))
}

/// Download a suggestion's attachment
/// GET /api/suggestions/:id/file
pub async fn download_suggestion_file(
    State(db): State<Arc<Database>>,
    State(uploads): State<UploadStore>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let suggestion = db.get_suggestion(id).await?;

    let (Some(file_name), Some(file_path)) = (suggestion.file_name, suggestion.file_path) else {
        return Err(ApiError::not_found("Attachment"));
    };
    let bytes = uploads.read(FsPath::new(&file_path)).await?;

    Ok(attachment_response(&file_name, bytes))
}

/// A user's own suggestions with any feedback
/// GET /api/users/:id/suggestions
pub async fn list_user_suggestions(
    State(db): State<Arc<Database>>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let suggestions = db.list_user_suggestions(user_id).await?;

    info!("Retrieved {} suggestions for user {}", suggestions.len(), user_id);
    Ok((StatusCode::OK, Json(suggestions)))
}

/// GET /api/admin/suggestions
pub async fn admin_list_suggestions(
    State(db): State<Arc<Database>>,
    AdminSession(_admin): AdminSession,
) -> Result<impl IntoResponse, ApiError> {
    let suggestions = db.list_all_suggestions().await?;

    Ok((StatusCode::OK, Json(suggestions)))
}

/// Reply to a suggestion
/// PUT /api/admin/suggestions/:id/feedback
pub async fn admin_feedback(
    State(db): State<Arc<Database>>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i32>,
    JsonOrForm(request): JsonOrForm<FeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let suggestion = db.set_suggestion_feedback(id, request).await?;

    info!("{} replied to suggestion {}", admin.username, id);
    Ok((StatusCode::OK, Json(suggestion)))
}
