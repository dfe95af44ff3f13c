use tokio_postgres::Row;
use tracing::info;

use super::Database;
use crate::error::ApiError;
use crate::models::{CreateMistakeRequest, MistakeRecord};

const MISTAKE_SELECT: &str = r#"
    SELECT m.id, m.user_id, m.word_id, w.english, w.chinese, w.pos, w.module, m.created_at
    FROM mistake_book m
    JOIN words w ON w.id = m.word_id
"#;

fn mistake_from_row(row: &Row) -> MistakeRecord {
    MistakeRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        word_id: row.get("word_id"),
        english: row.get("english"),
        chinese: row.get("chinese"),
        pos: row.get("pos"),
        module: row.get("module"),
        created_at: row.get("created_at"),
    }
}

impl Database {
    /// Adds a word to a user's mistake book. Returns the entry and whether it
    /// was newly created.
    pub async fn add_mistake(
        &self,
        request: CreateMistakeRequest,
    ) -> Result<(MistakeRecord, bool), ApiError> {
        request.validate().map_err(ApiError::Validation)?;

        let created = self.record_mistake(request.user_id, request.word_id).await?;

        let client = self.get_connection().await?;
        let sql = format!("{} WHERE m.user_id = $1 AND m.word_id = $2", MISTAKE_SELECT);
        let row = client
            .query_opt(&sql, &[&request.user_id, &request.word_id])
            .await?;

        match row {
            Some(row) => Ok((mistake_from_row(&row), created)),
            // Removed concurrently between the insert and the read
            None => Err(ApiError::not_found("Mistake")),
        }
    }

    /// Idempotent insert; `true` when a new row was written.
    pub(crate) async fn record_mistake(&self, user_id: i32, word_id: i32) -> Result<bool, ApiError> {
        let client = self.get_connection().await?;

        let inserted = client
            .execute(
                "INSERT INTO mistake_book (user_id, word_id) VALUES ($1, $2) ON CONFLICT (user_id, word_id) DO NOTHING",
                &[&user_id, &word_id],
            )
            .await
            .map_err(|e| match ApiError::from(e) {
                ApiError::Validation(_) => ApiError::validation("User or word does not exist"),
                other => other,
            })?;

        if inserted > 0 {
            info!("Recorded word {} in mistake book of user {}", word_id, user_id);
        }
        Ok(inserted > 0)
    }

    pub async fn list_mistakes(&self, user_id: i32) -> Result<Vec<MistakeRecord>, ApiError> {
        let client = self.get_connection().await?;

        let sql = format!("{} WHERE m.user_id = $1 ORDER BY m.created_at DESC, m.id DESC", MISTAKE_SELECT);
        let rows = client.query(&sql, &[&user_id]).await?;

        Ok(rows.iter().map(mistake_from_row).collect())
    }

    pub async fn delete_mistake(&self, id: i32) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        let deleted = client.execute("DELETE FROM mistake_book WHERE id = $1", &[&id]).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("Mistake"));
        }

        info!("Deleted mistake book entry {}", id);
        Ok(())
    }
}
