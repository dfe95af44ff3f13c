use tokio_postgres::Row;
use tracing::{info, warn};

use super::Database;
use crate::error::ApiError;
use crate::import::ParsedWord;
use crate::models::word::{is_correct_answer, mistake_owner};
use crate::models::{CheckAnswerRequest, CheckAnswerResponse, ModuleCount, Word};

const WORD_COLUMNS: &str = "id, english, chinese, pos, ipa, module, created_at";

fn word_from_row(row: &Row) -> Word {
    Word {
        id: row.get("id"),
        english: row.get("english"),
        chinese: row.get("chinese"),
        pos: row.get("pos"),
        ipa: row.get("ipa"),
        module: row.get("module"),
        created_at: row.get("created_at"),
    }
}

/// Rows written by one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportCounts {
    pub imported: u64,
    pub duplicates: u64,
}

impl Database {
    /// Inserts parsed words into `module` in a single transaction.
    /// Words already present in the module are left untouched and counted.
    pub async fn import_words(
        &self,
        module: &str,
        words: &[ParsedWord],
    ) -> Result<ImportCounts, ApiError> {
        let mut client = self.get_connection().await?;
        let transaction = client.transaction().await?;

        let statement = transaction
            .prepare_cached(
                r#"
                INSERT INTO words (english, chinese, pos, ipa, module)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (module, english) DO NOTHING
                "#,
            )
            .await?;

        let mut imported = 0;
        for word in words {
            imported += transaction
                .execute(&statement, &[&word.english, &word.chinese, &word.pos, &word.ipa, &module])
                .await?;
        }

        transaction.commit().await?;

        let counts = ImportCounts {
            imported,
            duplicates: words.len() as u64 - imported,
        };
        info!(
            "Imported {} words into module {} ({} duplicates)",
            counts.imported, module, counts.duplicates
        );
        Ok(counts)
    }

    pub async fn list_words(&self, module: Option<&str>) -> Result<Vec<Word>, ApiError> {
        let client = self.get_connection().await?;

        let rows = match module {
            Some(module) => {
                let sql = format!("SELECT {} FROM words WHERE module = $1 ORDER BY id", WORD_COLUMNS);
                client.query(&sql, &[&module]).await?
            }
            None => {
                let sql = format!("SELECT {} FROM words ORDER BY id", WORD_COLUMNS);
                client.query(&sql, &[]).await?
            }
        };

        Ok(rows.iter().map(word_from_row).collect())
    }

    pub async fn list_word_modules(&self) -> Result<Vec<ModuleCount>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client
            .query(
                "SELECT module, COUNT(*) AS count FROM words GROUP BY module ORDER BY module",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| ModuleCount {
                module: row.get("module"),
                count: row.get("count"),
            })
            .collect())
    }

    pub async fn quiz_words(
        &self,
        module: &str,
        limit: i64,
        shuffle: bool,
    ) -> Result<Vec<Word>, ApiError> {
        let client = self.get_connection().await?;

        let order = if shuffle { "RANDOM()" } else { "id" };
        let sql = format!(
            "SELECT {} FROM words WHERE module = $1 ORDER BY {} LIMIT $2",
            WORD_COLUMNS, order
        );

        let rows = client.query(&sql, &[&module, &limit]).await?;
        Ok(rows.iter().map(word_from_row).collect())
    }

    pub async fn get_word(&self, id: i32) -> Result<Word, ApiError> {
        let client = self.get_connection().await?;

        let sql = format!("SELECT {} FROM words WHERE id = $1", WORD_COLUMNS);
        let row = client.query_opt(&sql, &[&id]).await?;

        match row {
            Some(row) => Ok(word_from_row(&row)),
            None => Err(ApiError::not_found("Word")),
        }
    }

    pub async fn delete_word(&self, id: i32) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        let deleted = client.execute("DELETE FROM words WHERE id = $1", &[&id]).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("Word"));
        }

        info!("Deleted word {}", id);
        Ok(())
    }

    /// Grades a dictation answer. A wrong answer with a `user_id` lands in
    /// that user's mistake book.
    pub async fn check_answer(
        &self,
        word_id: i32,
        request: CheckAnswerRequest,
    ) -> Result<CheckAnswerResponse, ApiError> {
        let word = self.get_word(word_id).await?;
        let correct = is_correct_answer(&request.answer, &word.english);

        let mut recorded_mistake = false;
        match mistake_owner(correct, request.user_id) {
            Some(user_id) => match self.record_mistake(user_id, word.id).await {
                Ok(_) => recorded_mistake = true,
                Err(e) => warn!("Could not record mistake on word {} for user {}: {}", word.id, user_id, e),
            },
            None if !correct => {
                warn!("Wrong answer for word {} without a user account, not recorded", word.id);
            }
            None => {}
        }

        Ok(CheckAnswerResponse {
            word_id: word.id,
            correct,
            expected: word.english,
            recorded_mistake,
        })
    }
}
