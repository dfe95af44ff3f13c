use tokio_postgres::Row;
use tracing::info;

use super::Database;
use crate::error::ApiError;
use crate::models::{CreatePostRequest, Post, Quote, UpdateQuoteRequest};

/// Row id of the single forum quote.
const QUOTE_ID: i32 = 1;

const UPSERT_QUOTE: &str = r#"
    INSERT INTO quotes (id, content, updated_at)
    VALUES ($1, $2, NOW())
    ON CONFLICT (id) DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()
    RETURNING content, updated_at
"#;

fn post_from_row(row: &Row) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        author: row.get("author"),
        link: row.get("link"),
        created_at: row.get("created_at"),
    }
}

impl Database {
    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client
            .query(
                "SELECT id, title, content, author, link, created_at FROM posts ORDER BY created_at DESC, id DESC",
                &[],
            )
            .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// `default_author` is used when the request leaves the author blank.
    pub async fn create_post(
        &self,
        request: CreatePostRequest,
        default_author: &str,
    ) -> Result<Post, ApiError> {
        request.validate().map_err(ApiError::Validation)?;

        let title = request.get_normalized_title();
        let content = request.get_normalized_content();
        let author = request.get_normalized_author(default_author);
        let link = request.get_normalized_link();

        let client = self.get_connection().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO posts (title, content, author, link)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title, content, author, link, created_at
                "#,
                &[&title, &content, &author, &link],
            )
            .await?;

        let post = post_from_row(&row);
        info!("Created post {} '{}' by {}", post.id, post.title, post.author);
        Ok(post)
    }

    pub async fn delete_post(&self, id: i32) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        let deleted = client.execute("DELETE FROM posts WHERE id = $1", &[&id]).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("Post"));
        }

        info!("Deleted post {}", id);
        Ok(())
    }

    pub async fn get_quote(&self) -> Result<Quote, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_opt("SELECT content, updated_at FROM quotes WHERE id = $1", &[&QUOTE_ID])
            .await?;

        Ok(match row {
            Some(row) => Quote {
                content: row.get("content"),
                updated_at: Some(row.get("updated_at")),
            },
            None => Quote::fallback(),
        })
    }

    /// There is only ever one quote, stored under a fixed id.
    pub async fn update_quote(&self, request: UpdateQuoteRequest) -> Result<Quote, ApiError> {
        request.validate().map_err(ApiError::Validation)?;

        let content = request.get_normalized_content();
        let client = self.get_connection().await?;

        let row = client.query_one(UPSERT_QUOTE, &[&QUOTE_ID, &content]).await?;

        info!("Updated quote");
        Ok(Quote {
            content: row.get("content"),
            updated_at: Some(row.get("updated_at")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_upsert_targets_fixed_row() {
        assert_eq!(QUOTE_ID, 1);
        assert!(UPSERT_QUOTE.contains("VALUES ($1, $2, NOW())"));
        assert!(UPSERT_QUOTE.contains("ON CONFLICT (id) DO UPDATE"));
        assert!(UPSERT_QUOTE.contains("RETURNING content, updated_at"));
        assert!(!UPSERT_QUOTE.contains("SELECT"));
    }
}
