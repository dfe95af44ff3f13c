use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Mainland China mobile numbers: 11 digits starting with 13-19.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("phone pattern is valid"));

const MAX_USERNAME_CHARS: usize = 50;
const MIN_PASSWORD_CHARS: usize = 6;
const MAX_PASSWORD_CHARS: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Unknown values read back from the database degrade to `User`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub token: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err("Username cannot be empty".to_string());
        }

        if username.chars().count() > MAX_USERNAME_CHARS {
            return Err(format!("Username cannot exceed {} characters", MAX_USERNAME_CHARS));
        }

        if !is_valid_phone(self.phone.trim()) {
            return Err("Invalid phone number".to_string());
        }

        let password_chars = self.password.chars().count();
        if password_chars < MIN_PASSWORD_CHARS {
            return Err(format!("Password must be at least {} characters", MIN_PASSWORD_CHARS));
        }

        if password_chars > MAX_PASSWORD_CHARS {
            return Err(format!("Password cannot exceed {} characters", MAX_PASSWORD_CHARS));
        }

        Ok(())
    }

    pub fn get_normalized_username(&self) -> String {
        self.username.trim().to_string()
    }

    pub fn get_normalized_phone(&self) -> String {
        self.phone.trim().to_string()
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("Username and password are required".to_string());
        }
        Ok(())
    }

    pub fn get_normalized_username(&self) -> String {
        self.username.trim().to_string()
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}
