// Account handlers: registration, login and the current session

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    extract::{AuthSession, JsonOrForm},
    models::{LoginRequest, RegisterRequest, RegisterResponse},
    state::AppState,
};

/// Register a new user
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Registering user: {}", request.username.trim());

    let user_id = state.db.register_user(&state.config.admin, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            user_id,
        }),
    ))
}

/// Log in and receive a bearer token
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .db
        .login(&state.config.admin, request, state.config.session_ttl)
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<impl IntoResponse, ApiError> {
    state.db.delete_session(&session.token).await?;

    info!("User {} logged out", session.username);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
pub async fn me(AuthSession(session): AuthSession) -> impl IntoResponse {
    Json(session.principal())
}
