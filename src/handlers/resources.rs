// Resource handlers: study files grouped by module

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::path::Path as FsPath;
use std::sync::Arc;
use tracing::info;

use super::files::{attachment_response, read_multipart};
use crate::{
    db::Database,
    error::ApiError,
    extract::AdminSession,
    models::{NewResource, StoredResource},
    state::AppState,
    storage::UploadStore,
};

const RESOURCE_DIR: &str = "resources";

#[derive(Debug, Deserialize)]
pub struct ListResourcesQuery {
    pub module: Option<String>,
}

/// GET /api/resources?module=<name>
pub async fn list_resources(
    State(db): State<Arc<Database>>,
    Query(params): Query<ListResourcesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let module = params
        .module
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    let resources = db.list_resources(module).await?;

    info!("Retrieved {} resources (module: {:?})", resources.len(), module);
    Ok((StatusCode::OK, Json(resources)))
}

/// GET /api/resources/modules
pub async fn list_resource_modules(
    State(db): State<Arc<Database>>,
) -> Result<impl IntoResponse, ApiError> {
    let modules = db.list_resource_modules().await?;

    Ok((StatusCode::OK, Json(modules)))
}

/// Upload a study file
/// POST /api/resources (multipart: title, module, file)
pub async fn upload_resource(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (fields, file) = read_multipart(multipart).await?;

    let mut new_resource = NewResource::default();
    for (name, value) in fields {
        match name.as_str() {
            "title" => new_resource.title = value,
            "module" => new_resource.module = value,
            _ => {}
        }
    }
    new_resource.validate().map_err(ApiError::Validation)?;

    let file = file
        .filter(|f| !f.bytes.is_empty())
        .ok_or_else(|| ApiError::validation("A non-empty file is required"))?;

    let (file_name, file_path) = state.uploads.save(RESOURCE_DIR, &file.name, &file.bytes).await?;

    let stored = StoredResource {
        title: new_resource.title.trim().to_string(),
        module: new_resource.module.trim().to_string(),
        file_name,
        file_path: file_path.clone(),
    };

    let resource = match state.db.create_resource(stored).await {
        Ok(resource) => resource,
        Err(e) => {
            state.uploads.remove(&file_path).await;
            return Err(e);
        }
    };

    info!("Resource {} uploaded by {}", resource.id, admin.username);
    Ok((StatusCode::CREATED, Json(resource)))
}

/// Download the stored file
/// GET /api/resources/:id/file
pub async fn download_resource(
    State(db): State<Arc<Database>>,
    State(uploads): State<UploadStore>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = db.get_resource(id).await?;
    let bytes = uploads.read(FsPath::new(&resource.file_path)).await?;

    Ok(attachment_response(&resource.file_name, bytes))
}

/// DELETE /api/resources/:id
pub async fn delete_resource(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = state.db.delete_resource(id).await?;
    state.uploads.remove(FsPath::new(&resource.file_path)).await;

    Ok(StatusCode::NO_CONTENT)
}
