use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_CONTENT_CHARS: usize = 2000;

/// A message from a user to the administrators, with optional feedback.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub id: i32,
    pub user_id: i32,
    pub content: String,
    pub feedback: Option<String>,
    /// Original name of the attached file, if one was sent.
    pub file_name: Option<String>,
    /// Download route for the attachment.
    pub url: Option<String>,
    #[serde(skip_serializing)]
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub feedback_at: Option<DateTime<Utc>>,
}

/// Admin view: the suggestion plus who sent it.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionWithUser {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub username: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSuggestionRequest {
    pub user_id: i32,
    pub content: String,
}

/// A file stored alongside a new suggestion.
#[derive(Debug)]
pub struct SuggestionAttachment {
    pub file_name: String,
    pub file_path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
}

fn validate_text(field: &str, value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }

    if value.chars().count() > MAX_CONTENT_CHARS {
        return Err(format!("{} cannot exceed {} characters", field, MAX_CONTENT_CHARS));
    }

    Ok(())
}

impl Suggestion {
    pub fn attachment_url(id: i32) -> String {
        format!("/api/suggestions/{}/file", id)
    }
}

impl CreateSuggestionRequest {
    /// Builds a request from the text parts of a multipart form.
    pub fn from_form_fields(fields: Vec<(String, String)>) -> Result<Self, String> {
        let mut user_id = None;
        let mut content = String::new();

        for (name, value) in fields {
            match name.as_str() {
                "user_id" => {
                    let id = value
                        .trim()
                        .parse::<i32>()
                        .map_err(|_| "User ID must be a number".to_string())?;
                    user_id = Some(id);
                }
                "content" => content = value,
                _ => {}
            }
        }

        let user_id = user_id.ok_or_else(|| "User ID is required".to_string())?;
        Ok(CreateSuggestionRequest { user_id, content })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.user_id <= 0 {
            return Err("User ID must be a positive number".to_string());
        }
        validate_text("Content", &self.content)
    }

    pub fn get_normalized_content(&self) -> String {
        self.content.trim().to_string()
    }
}

impl FeedbackRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_text("Feedback", &self.feedback)
    }

    pub fn get_normalized_feedback(&self) -> String {
        self.feedback.trim().to_string()
    }
}
