// Library root for the Xueling education platform API

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod import;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
