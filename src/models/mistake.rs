use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A word a user got wrong, joined with the word itself.
#[derive(Debug, Clone, Serialize)]
pub struct MistakeRecord {
    pub id: i32,
    pub user_id: i32,
    pub word_id: i32,
    pub english: String,
    pub chinese: String,
    pub pos: String,
    pub module: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMistakeRequest {
    pub user_id: i32,
    pub word_id: i32,
}

impl CreateMistakeRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id <= 0 {
            return Err("User ID must be a positive number".to_string());
        }

        if self.word_id <= 0 {
            return Err("Word ID must be a positive number".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mistake_validation() {
        assert!(CreateMistakeRequest { user_id: 1, word_id: 2 }.validate().is_ok());
        assert!(CreateMistakeRequest { user_id: 0, word_id: 2 }.validate().is_err());
        assert!(CreateMistakeRequest { user_id: 1, word_id: -1 }.validate().is_err());
    }

    #[test]
    fn test_create_mistake_request_deserialization() {
        let request: CreateMistakeRequest = serde_json::from_str(r#"{"user_id":3,"word_id":14}"#)
            .expect("Failed to deserialize CreateMistakeRequest");
        assert_eq!(request.user_id, 3);
        assert_eq!(request.word_id, 14);
    }
}
