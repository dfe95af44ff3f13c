use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown when no quote has been stored yet.
pub const DEFAULT_QUOTE: &str = "书山有路勤为径";

const MAX_TITLE_CHARS: usize = 200;
const MAX_CONTENT_CHARS: usize = 10_000;
const MAX_AUTHOR_CHARS: usize = 100;
const MAX_LINK_CHARS: usize = 500;
const MAX_QUOTE_CHARS: usize = 500;

/// A forum announcement published by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub content: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuoteRequest {
    pub content: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(format!("Title cannot exceed {} characters", MAX_TITLE_CHARS));
        }

        let content = self.content.trim();
        if content.is_empty() {
            return Err("Content cannot be empty".to_string());
        }

        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(format!("Content cannot exceed {} characters", MAX_CONTENT_CHARS));
        }

        if let Some(author) = self.author.as_deref().map(str::trim) {
            if author.chars().count() > MAX_AUTHOR_CHARS {
                return Err(format!("Author cannot exceed {} characters", MAX_AUTHOR_CHARS));
            }
        }

        if let Some(link) = self.get_normalized_link() {
            if link.chars().count() > MAX_LINK_CHARS {
                return Err(format!("Link cannot exceed {} characters", MAX_LINK_CHARS));
            }

            if !(link.starts_with("http://") || link.starts_with("https://")) {
                return Err("Link must start with http:// or https://".to_string());
            }
        }

        Ok(())
    }

    pub fn get_normalized_title(&self) -> String {
        self.title.trim().to_string()
    }

    pub fn get_normalized_content(&self) -> String {
        self.content.trim().to_string()
    }

    /// Trimmed author, falling back to the publishing account.
    pub fn get_normalized_author(&self, fallback: &str) -> String {
        self.author
            .as_ref()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Trimmed link, `None` if empty.
    pub fn get_normalized_link(&self) -> Option<String> {
        self.link
            .as_ref()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
    }
}

impl Quote {
    pub fn fallback() -> Self {
        Quote {
            content: DEFAULT_QUOTE.to_string(),
            updated_at: None,
        }
    }
}

impl UpdateQuoteRequest {
    pub fn validate(&self) -> Result<(), String> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err("Quote cannot be empty".to_string());
        }

        if content.chars().count() > MAX_QUOTE_CHARS {
            return Err(format!("Quote cannot exceed {} characters", MAX_QUOTE_CHARS));
        }

        Ok(())
    }

    pub fn get_normalized_content(&self) -> String {
        self.content.trim().to_string()
    }
}
