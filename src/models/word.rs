use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::validate_module;

pub const DEFAULT_QUIZ_LIMIT: i64 = 20;
pub const MAX_QUIZ_LIMIT: i64 = 200;

/// A vocabulary entry belonging to a module (word list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub id: i32,
    pub english: String,
    pub chinese: String,
    pub pos: String,
    pub ipa: String,
    pub module: String,
    pub created_at: DateTime<Utc>,
}

/// Number of entries carrying a module tag.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleCount {
    pub module: String,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListWordsQuery {
    pub module: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    pub module: Option<String>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Deserialize)]
pub struct CheckAnswerRequest {
    pub answer: String,
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CheckAnswerResponse {
    pub word_id: i32,
    pub correct: bool,
    pub expected: String,
    pub recorded_mistake: bool,
}

/// Outcome of a spreadsheet upload.
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub message: String,
    pub module: String,
    pub file_name: String,
    pub imported: u64,
    /// Rows whose word already existed in the module.
    pub duplicates: u64,
    /// Rows that could not be read as a word.
    pub skipped: usize,
}

impl QuizQuery {
    /// Returns the trimmed module and the limit clamped to `1..=MAX_QUIZ_LIMIT`.
    pub fn normalized(&self) -> Result<(String, i64), String> {
        let module = self.module.as_deref().unwrap_or("").trim().to_string();
        validate_module(&module)?;

        let limit = self
            .limit
            .unwrap_or(DEFAULT_QUIZ_LIMIT)
            .clamp(1, MAX_QUIZ_LIMIT);

        Ok((module, limit))
    }
}

impl ListWordsQuery {
    pub fn get_normalized_module(&self) -> Option<String> {
        self.module
            .as_ref()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

/// Dictation check: surrounding whitespace and letter case are ignored.
pub fn is_correct_answer(answer: &str, english: &str) -> bool {
    answer.trim().to_lowercase() == english.trim().to_lowercase()
}

/// The user whose mistake book should receive a wrong answer, if any.
///
/// Only real accounts have a mistake book; the built-in administrator
/// (id 0) and anonymous answers are graded without recording.
pub fn mistake_owner(correct: bool, user_id: Option<i32>) -> Option<i32> {
    if correct {
        return None;
    }
    user_id.filter(|id| *id > 0)
}
