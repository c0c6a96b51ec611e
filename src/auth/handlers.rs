// HTTP handlers for authentication endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{Credentials, NewUser, RegisterRequest, TokenResponse, UserEnvelope},
};
use crate::error::{ApiError, ErrorResponse};
use crate::repository::RepositoryError;
use crate::AppState;

/// Exchange credentials for a signed token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse,
            example = json!({"error": "invalid password", "error_code": "UNAUTHORIZED", "timestamp": "2024-01-01T00:00:00+00:00"})),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(credentials) = payload?;
    credentials.validate()?;
    tracing::debug!("Login attempt for {}", credentials.email);

    // An unknown email is reported like a wrong password
    let user = match state.users.find_by_email(&credentials.email).await {
        Ok(user) => user,
        Err(RepositoryError::UserNotFound) => return Err(AuthError::InvalidCredentials.into()),
        Err(e) => return Err(e.into()),
    };

    let auth = state.auth.clone();
    let hash = user.password.clone();
    let matches = tokio::task::spawn_blocking(move || {
        auth.verify_password(&credentials.password, &hash)
    })
    .await?;

    if !matches {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.auth.generate_token(&user.email, &user.role)?;
    tracing::info!("Issued token for user {}", user.id);

    Ok(Json(TokenResponse { token }))
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = UserEnvelope),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    tracing::debug!("Registering user {}", request.email);

    let auth = state.auth.clone();
    let password = request.password;
    let hash = tokio::task::spawn_blocking(move || auth.hash_password(&password)).await??;

    let user = state
        .users
        .create(NewUser {
            name: request.name,
            email: request.email,
            password: hash,
            role: request.role,
        })
        .await?;

    tracing::info!("Registered user {}", user.id);
    Ok(Json(UserEnvelope { user }))
}
