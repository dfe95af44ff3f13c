use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    handlers::{
        auth, database_health, forum, health_check, mistakes, resources, suggestions, words,
    },
    middleware::create_middleware_stack,
    state::AppState,
};

/// Create the Axum router with all endpoints and middleware
pub fn create_router(state: AppState) -> Router {
    let max_body = state.config.uploads.max_bytes;

    Router::new()
        // Health check endpoints
        .route("/health", get(health_check))
        .route("/health/db", get(database_health))
        // Accounts
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Forum
        .route("/api/forum/posts", get(forum::list_posts).post(forum::create_post))
        .route("/api/forum/posts/:id", delete(forum::delete_post))
        .route("/api/forum/quote", get(forum::get_quote).put(forum::update_quote))
        // Resources
        .route("/api/resources", get(resources::list_resources).post(resources::upload_resource))
        .route("/api/resources/modules", get(resources::list_resource_modules))
        .route("/api/resources/:id", delete(resources::delete_resource))
        .route("/api/resources/:id/file", get(resources::download_resource))
        // Suggestions
        .route("/api/suggestions", post(suggestions::submit_suggestion))
        .route("/api/suggestions/:id/file", get(suggestions::download_suggestion_file))
        .route("/api/users/:id/suggestions", get(suggestions::list_user_suggestions))
        .route("/api/admin/suggestions", get(suggestions::admin_list_suggestions))
        .route("/api/admin/suggestions/:id/feedback", put(suggestions::admin_feedback))
        // Vocabulary
        .route("/api/words", get(words::list_words))
        .route("/api/words/upload", post(words::upload_words))
        .route("/api/words/modules", get(words::list_word_modules))
        .route("/api/words/quiz", get(words::quiz_words))
        .route("/api/words/:id", delete(words::delete_word))
        .route("/api/words/:id/check", post(words::check_answer))
        // Mistake book
        .route("/api/mistakes", post(mistakes::add_mistake))
        // GET takes a user id, DELETE an entry id
        .route("/api/mistakes/:id", get(mistakes::list_mistakes).delete(mistakes::delete_mistake))
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
        .layer(create_middleware_stack())
}
