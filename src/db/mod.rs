//! PostgreSQL repository layer.
//!
//! `Database` owns a deadpool connection pool; each feature adds its queries in
//! its own `impl Database` block in a sibling module.

mod forum;
mod mistakes;
mod resources;
mod suggestions;
mod users;
mod words;

pub use words::ImportCounts;

use crate::config::DatabaseConfig;
use crate::error::ApiError;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

/// Schema, applied in order at start-up. Every statement is idempotent.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "users table",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            username VARCHAR(50) UNIQUE NOT NULL,
            phone VARCHAR(20) UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            role VARCHAR(10) NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "sessions table",
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(64) PRIMARY KEY,
            user_id INTEGER REFERENCES users(id) ON DELETE CASCADE,
            username VARCHAR(50) NOT NULL,
            role VARCHAR(10) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "sessions expires_at index",
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at)",
    ),
    (
        "posts table",
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id SERIAL PRIMARY KEY,
            title VARCHAR(200) NOT NULL,
            content TEXT NOT NULL,
            author VARCHAR(100) NOT NULL,
            link VARCHAR(500),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "posts created_at index",
        "CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC)",
    ),
    (
        "quotes table",
        r#"
        CREATE TABLE IF NOT EXISTS quotes (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            content TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "resources table",
        r#"
        CREATE TABLE IF NOT EXISTS resources (
            id SERIAL PRIMARY KEY,
            title VARCHAR(200) NOT NULL,
            module VARCHAR(100) NOT NULL,
            file_name VARCHAR(255) NOT NULL,
            file_path TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "resources module index",
        "CREATE INDEX IF NOT EXISTS idx_resources_module ON resources(module)",
    ),
    (
        "suggestions table",
        r#"
        CREATE TABLE IF NOT EXISTS suggestions (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            feedback TEXT,
            file_name VARCHAR(255),
            file_path TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            feedback_at TIMESTAMPTZ
        )
        "#,
    ),
    (
        "suggestions attachment columns",
        r#"
        ALTER TABLE suggestions
            ADD COLUMN IF NOT EXISTS file_name VARCHAR(255),
            ADD COLUMN IF NOT EXISTS file_path TEXT
        "#,
    ),
    (
        "suggestions user_id index",
        "CREATE INDEX IF NOT EXISTS idx_suggestions_user_id ON suggestions(user_id)",
    ),
    (
        "words table",
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id SERIAL PRIMARY KEY,
            english VARCHAR(100) NOT NULL,
            chinese TEXT NOT NULL,
            pos VARCHAR(50) NOT NULL DEFAULT '',
            ipa VARCHAR(100) NOT NULL DEFAULT '',
            module VARCHAR(100) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (module, english)
        )
        "#,
    ),
    (
        "words english index",
        "CREATE INDEX IF NOT EXISTS idx_words_english ON words(english)",
    ),
    (
        "mistake_book table",
        r#"
        CREATE TABLE IF NOT EXISTS mistake_book (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            word_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, word_id)
        )
        "#,
    ),
];

impl Database {
    /// Builds the pool and checks that a connection can actually be made.
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!("Creating PostgreSQL connection pool for host: {}:{}", config.host, config.port);

        let db = Self::connect_lazy(config)?;
        db.test_connection().await?;

        Ok(db)
    }

    /// Builds the pool without opening a connection; the first query connects.
    pub fn connect_lazy(config: DatabaseConfig) -> Result<Self, ApiError> {
        let pool = Self::create_pool(config)?;
        Ok(Database { pool })
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);
        pg_config.connect_timeout = Some(config.connection_timeout);

        pg_config.ssl_mode = Some(match config.ssl_mode.as_str() {
            "disable" => deadpool_postgres::SslMode::Disable,
            "prefer" => deadpool_postgres::SslMode::Prefer,
            "require" => deadpool_postgres::SslMode::Require,
            other => {
                warn!("Unknown SSL mode '{}', defaulting to 'prefer'", other);
                deadpool_postgres::SslMode::Prefer
            }
        });

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let mut pool_config = deadpool_postgres::PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder()
            .build()
            .map_err(|e| {
                error!("Failed to create TLS connector: {}", e);
                ApiError::Database(format!("TLS connector creation failed: {}", e))
            })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                ApiError::Database(format!("Connection pool creation failed: {}", e))
            })
    }

    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    pub async fn health_check(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                ApiError::Database(format!("Health check failed: {}", e))
            })?;

        Ok(())
    }

    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database connection test failed: {}", e);
                ApiError::Database(format!("Connection test failed: {}", e))
            })?;

        info!("Database connection test successful");
        Ok(())
    }

    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        for (name, sql) in MIGRATIONS {
            client.execute(*sql, &[])
                .await
                .map_err(|e| {
                    error!("Failed to create {}: {}", name, e);
                    ApiError::Database(format!("Migration '{}' failed: {}", name, e))
                })?;
        }

        info!("Database migrations completed successfully ({} statements)", MIGRATIONS.len());
        Ok(())
    }

    /// Fills empty `words` and `posts` tables with a little demo content.
    pub async fn seed_demo_content(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        let word_count: i64 = client.query_one("SELECT COUNT(*) FROM words", &[])
            .await?
            .get(0);

        if word_count == 0 {
            let words = [
                ("persistence", "坚持", "n.", "/pəˈsɪstəns/", "考研词汇"),
                ("efficient", "高效的", "adj.", "/ɪˈfɪʃnt/", "考研词汇"),
                ("innovation", "创新", "n.", "/ˌɪnəˈveɪʃn/", "雅思词汇"),
                ("strategy", "策略", "n.", "/ˈstrætədʒi/", "雅思词汇"),
            ];

            for (english, chinese, pos, ipa, module) in words {
                client.execute(
                    "INSERT INTO words (english, chinese, pos, ipa, module) VALUES ($1, $2, $3, $4, $5) ON CONFLICT DO NOTHING",
                    &[&english, &chinese, &pos, &ipa, &module],
                )
                .await?;
            }
            info!("Seeded {} demo words", words.len());
        } else {
            info!("Words table already contains {} entries, skipping seed", word_count);
        }

        let post_count: i64 = client.query_one("SELECT COUNT(*) FROM posts", &[])
            .await?
            .get(0);

        if post_count == 0 {
            let posts = [
                ("欢迎来到学令教育", "这是一个专注学习的平台。", None),
                ("学习技巧分享", "高效学习的五个方法...", Some("https://example.com/tips")),
            ];

            for (title, content, link) in posts {
                client.execute(
                    "INSERT INTO posts (title, content, author, link) VALUES ($1, $2, '管理员', $3)",
                    &[&title, &content, &link],
                )
                .await?;
            }
            info!("Seeded {} demo posts", posts.len());
        }

        Ok(())
    }
}
