// Vocabulary handlers: spreadsheet import, listing and dictation quizzes

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::files::read_multipart;
use crate::{
    db::Database,
    error::ApiError,
    extract::{AdminSession, JsonOrForm},
    import,
    models::resource::validate_module,
    models::word::ListWordsQuery,
    models::{CheckAnswerRequest, ImportSummary, QuizQuery},
};

/// Import a word list from an Excel or CSV file
/// POST /api/words/upload (multipart: module, file)
pub async fn upload_words(
    State(db): State<Arc<Database>>,
    AdminSession(admin): AdminSession,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (fields, file) = read_multipart(multipart).await?;

    let module = fields
        .into_iter()
        .find(|(name, _)| name == "module")
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default();
    validate_module(&module).map_err(ApiError::Validation)?;

    let file = file
        .filter(|f| !f.bytes.is_empty())
        .ok_or_else(|| ApiError::validation("A non-empty file is required"))?;

    info!("{} is importing {} ({} bytes) into module {}", admin.username, file.name, file.bytes.len(), module);

    let file_name = file.name.clone();
    let sheet = tokio::task::spawn_blocking(move || import::parse_upload(&file.name, &file.bytes))
        .await
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("Spreadsheet parsing task failed")))??;

    let counts = db.import_words(&module, &sheet.words).await?;

    let summary = ImportSummary {
        message: format!("Imported {} words into {}", counts.imported, module),
        module,
        file_name,
        imported: counts.imported,
        duplicates: counts.duplicates,
        skipped: sheet.skipped,
    };

    Ok((StatusCode::OK, Json(summary)))
}

/// GET /api/words?module=<name>
pub async fn list_words(
    State(db): State<Arc<Database>>,
    Query(params): Query<ListWordsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let module = params.get_normalized_module();
    let words = db.list_words(module.as_deref()).await?;

    info!("Retrieved {} words (module: {:?})", words.len(), module);
    Ok((StatusCode::OK, Json(words)))
}

/// GET /api/words/modules
pub async fn list_word_modules(
    State(db): State<Arc<Database>>,
) -> Result<impl IntoResponse, ApiError> {
    let modules = db.list_word_modules().await?;

    Ok((StatusCode::OK, Json(modules)))
}

/// Words for a dictation round
/// GET /api/words/quiz?module=<name>&limit=<n>&shuffle=<bool>
pub async fn quiz_words(
    State(db): State<Arc<Database>>,
    Query(params): Query<QuizQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (module, limit) = params.normalized().map_err(ApiError::Validation)?;

    let words = db.quiz_words(&module, limit, params.shuffle).await?;

    info!("Quiz of {} words from module {}", words.len(), module);
    Ok((StatusCode::OK, Json(words)))
}

/// Grade one answer
/// POST /api/words/:id/check
pub async fn check_answer(
    State(db): State<Arc<Database>>,
    Path(id): Path<i32>,
    JsonOrForm(request): JsonOrForm<CheckAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = db.check_answer(id, request).await?;

    Ok((StatusCode::OK, Json(response)))
}

/// DELETE /api/words/:id
pub async fn delete_word(
    State(db): State<Arc<Database>>,
    AdminSession(_admin): AdminSession,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    db.delete_word(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
