use std::time::Duration;

use chrono::Utc;
use tokio_postgres::Row;
use tracing::{info, warn};
use uuid::Uuid;

use super::Database;
use crate::config::AdminConfig;
use crate::error::ApiError;
use crate::models::session::BUILTIN_ADMIN_ID;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, Role, Session, User};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

fn user_from_row(row: &Row) -> User {
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        username: row.get("username"),
        phone: row.get("phone"),
        password_hash: row.get("password_hash"),
        role: Role::from_db(&role),
        created_at: row.get("created_at"),
    }
}

fn session_from_row(row: &Row) -> Session {
    let role: String = row.get("role");
    Session {
        token: row.get("token"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        role: Role::from_db(&role),
        expires_at: row.get("expires_at"),
    }
}

async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("Password hashing task failed")))?
        .map_err(ApiError::from)
}

async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("Password verification task failed")))?
        .map_err(ApiError::from)
}

impl Database {
    /// Creates a regular user account and returns its id.
    ///
    /// The administrator's username is reserved. A phone number that is
    /// already registered is a validation error; a taken username is a conflict.
    pub async fn register_user(
        &self,
        admin: &AdminConfig,
        request: RegisterRequest,
    ) -> Result<i32, ApiError> {
        request.validate().map_err(ApiError::Validation)?;

        let username = request.get_normalized_username();
        let phone = request.get_normalized_phone();

        if username.eq_ignore_ascii_case(&admin.username) {
            return Err(ApiError::validation("This username is reserved"));
        }

        let client = self.get_connection().await?;

        let phone_taken = client
            .query_opt("SELECT 1 FROM users WHERE phone = $1", &[&phone])
            .await?
            .is_some();
        if phone_taken {
            return Err(ApiError::validation("Phone number already registered"));
        }

        let password_hash = hash_password(request.password).await?;

        let row = client
            .query_one(
                "INSERT INTO users (username, phone, password_hash, role) VALUES ($1, $2, $3, 'user') RETURNING id",
                &[&username, &phone, &password_hash],
            )
            .await
            .map_err(|e| match ApiError::from(e) {
                // Lost a race with another registration for the same phone
                ApiError::Conflict(msg) if msg.starts_with("Phone") => ApiError::Validation(msg),
                other => other,
            })?;

        let id: i32 = row.get(0);
        info!("Registered user {} with id {}", username, id);
        Ok(id)
    }

    /// Checks credentials and opens a session valid for `ttl`.
    ///
    /// The configured administrator is matched first and reported with id 0.
    pub async fn login(
        &self,
        admin: &AdminConfig,
        request: LoginRequest,
        ttl: Duration,
    ) -> Result<LoginResponse, ApiError> {
        request.validate().map_err(ApiError::Validation)?;

        let username = request.get_normalized_username();

        if admin.matches(&username, &request.password) {
            let session = self.create_session(None, &username, Role::Admin, ttl).await?;
            info!("Administrator {} logged in", username);
            return Ok(LoginResponse {
                id: BUILTIN_ADMIN_ID,
                username,
                role: Role::Admin,
                token: session.token,
            });
        }

        let client = self.get_connection().await?;
        let row = client
            .query_opt(
                "SELECT id, username, phone, password_hash, role, created_at FROM users WHERE username = $1",
                &[&username],
            )
            .await?;

        let Some(row) = row else {
            warn!("Login failed for unknown user {}", username);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        };
        let user = user_from_row(&row);

        if !verify_password(request.password, user.password_hash.clone()).await? {
            warn!("Login failed for user {}: wrong password", username);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        let session = self.create_session(Some(user.id), &user.username, user.role, ttl).await?;
        info!("User {} (id {}) logged in", user.username, user.id);

        Ok(LoginResponse {
            id: user.id,
            username: user.username,
            role: user.role,
            token: session.token,
        })
    }

    pub async fn create_session(
        &self,
        user_id: Option<i32>,
        username: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<Session, ApiError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("Session TTL out of range")))?;

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + ttl;

        let client = self.get_connection().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO sessions (token, user_id, username, role, expires_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING token, user_id, username, role, expires_at
                "#,
                &[&token, &user_id, &username, &role.as_str(), &expires_at],
            )
            .await?;

        Ok(session_from_row(&row))
    }

    /// Resolves a bearer token. Unknown and expired tokens both yield `None`.
    pub async fn find_session(&self, token: &str) -> Result<Option<Session>, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_opt(
                "SELECT token, user_id, username, role, expires_at FROM sessions WHERE token = $1",
                &[&token],
            )
            .await?;

        let Some(session) = row.as_ref().map(session_from_row) else {
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            client.execute("DELETE FROM sessions WHERE token = $1", &[&token]).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub async fn delete_session(&self, token: &str) -> Result<(), ApiError> {
        let client = self.get_connection().await?;
        client.execute("DELETE FROM sessions WHERE token = $1", &[&token]).await?;
        Ok(())
    }

    pub async fn purge_expired_sessions(&self) -> Result<u64, ApiError> {
        let client = self.get_connection().await?;
        let removed = client
            .execute("DELETE FROM sessions WHERE expires_at <= NOW()", &[])
            .await?;

        if removed > 0 {
            info!("Purged {} expired sessions", removed);
        }
        Ok(removed)
    }
}
