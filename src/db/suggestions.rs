use tokio_postgres::Row;
use tracing::info;

use super::Database;
use crate::error::ApiError;
use crate::models::{
    CreateSuggestionRequest, FeedbackRequest, Suggestion, SuggestionAttachment, SuggestionWithUser,
};

const SUGGESTION_COLUMNS: &str =
    "id, user_id, content, feedback, file_name, file_path, created_at, feedback_at";

fn suggestion_from_row(row: &Row) -> Suggestion {
    let id: i32 = row.get("id");
    let file_path: Option<String> = row.get("file_path");
    Suggestion {
        id,
        user_id: row.get("user_id"),
        content: row.get("content"),
        feedback: row.get("feedback"),
        file_name: row.get("file_name"),
        url: file_path.as_ref().map(|_| Suggestion::attachment_url(id)),
        file_path,
        created_at: row.get("created_at"),
        feedback_at: row.get("feedback_at"),
    }
}

impl Database {
    /// Stores a suggestion. An attachment must already be saved to disk.
    pub async fn create_suggestion(
        &self,
        request: CreateSuggestionRequest,
        attachment: Option<SuggestionAttachment>,
    ) -> Result<Suggestion, ApiError> {
        request.validate().map_err(ApiError::Validation)?;

        let content = request.get_normalized_content();
        let file_name = attachment.as_ref().map(|a| a.file_name.clone());
        let file_path = attachment
            .as_ref()
            .map(|a| a.file_path.to_string_lossy().into_owned());

        let client = self.get_connection().await?;

        let row = client
            .query_one(
                &format!(
                    "INSERT INTO suggestions (user_id, content, file_name, file_path) VALUES ($1, $2, $3, $4) RETURNING {}",
                    SUGGESTION_COLUMNS
                ),
                &[&request.user_id, &content, &file_name, &file_path],
            )
            .await
            .map_err(|e| match ApiError::from(e) {
                ApiError::Validation(_) => ApiError::validation("User does not exist"),
                other => other,
            })?;

        let suggestion = suggestion_from_row(&row);
        info!(
            "User {} submitted suggestion {} (attachment: {})",
            suggestion.user_id,
            suggestion.id,
            suggestion.file_name.is_some()
        );
        Ok(suggestion)
    }

    pub async fn get_suggestion(&self, id: i32) -> Result<Suggestion, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_opt(
                &format!("SELECT {} FROM suggestions WHERE id = $1", SUGGESTION_COLUMNS),
                &[&id],
            )
            .await?;

        row.as_ref()
            .map(suggestion_from_row)
            .ok_or_else(|| ApiError::not_found("Suggestion"))
    }

    pub async fn list_user_suggestions(&self, user_id: i32) -> Result<Vec<Suggestion>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client
            .query(
                &format!(
                    "SELECT {} FROM suggestions WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
                    SUGGESTION_COLUMNS
                ),
                &[&user_id],
            )
            .await?;

        Ok(rows.iter().map(suggestion_from_row).collect())
    }

    pub async fn list_all_suggestions(&self) -> Result<Vec<SuggestionWithUser>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client
            .query(
                r#"
                SELECT s.id, s.user_id, s.content, s.feedback, s.file_name, s.file_path,
                       s.created_at, s.feedback_at,
                       u.username, u.phone
                FROM suggestions s
                JOIN users u ON u.id = s.user_id
                ORDER BY s.created_at DESC, s.id DESC
                "#,
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| SuggestionWithUser {
                suggestion: suggestion_from_row(row),
                username: row.get("username"),
                phone: row.get("phone"),
            })
            .collect())
    }

    pub async fn set_suggestion_feedback(
        &self,
        id: i32,
        request: FeedbackRequest,
    ) -> Result<Suggestion, ApiError> {
        request.validate().map_err(ApiError::Validation)?;

        let feedback = request.get_normalized_feedback();
        let client = self.get_connection().await?;

        let row = client
            .query_opt(
                &format!(
                    "UPDATE suggestions SET feedback = $1, feedback_at = NOW() WHERE id = $2 RETURNING {}",
                    SUGGESTION_COLUMNS
                ),
                &[&feedback, &id],
            )
            .await?;

        match row {
            Some(row) => {
                info!("Feedback recorded for suggestion {}", id);
                Ok(suggestion_from_row(&row))
            }
            None => Err(ApiError::not_found("Suggestion")),
        }
    }
}
