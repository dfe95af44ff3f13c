use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

const MAX_TITLE_CHARS: usize = 200;
const MAX_MODULE_CHARS: usize = 100;

/// An uploaded study file, grouped by subject module.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub id: i32,
    pub title: String,
    pub module: String,
    pub file_name: String,
    /// Download route for the stored file.
    pub url: String,
    #[serde(skip_serializing)]
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

/// Text fields of a resource upload, collected from the multipart form.
#[derive(Debug, Default)]
pub struct NewResource {
    pub title: String,
    pub module: String,
}

/// A validated resource whose file has already been stored.
#[derive(Debug)]
pub struct StoredResource {
    pub title: String,
    pub module: String,
    pub file_name: String,
    pub file_path: PathBuf,
}

impl Resource {
    pub fn download_url(id: i32) -> String {
        format!("/api/resources/{}/file", id)
    }
}

impl NewResource {
    pub fn validate(&self) -> Result<(), String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(format!("Title cannot exceed {} characters", MAX_TITLE_CHARS));
        }

        validate_module(&self.module)
    }
}

/// Module names tag both resources and vocabulary words.
pub fn validate_module(module: &str) -> Result<(), String> {
    let module = module.trim();
    if module.is_empty() {
        return Err("Module cannot be empty".to_string());
    }

    if module.chars().count() > MAX_MODULE_CHARS {
        return Err(format!("Module cannot exceed {} characters", MAX_MODULE_CHARS));
    }

    Ok(())
}
