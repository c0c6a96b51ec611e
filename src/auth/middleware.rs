// Authentication middleware for protected routes

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{error::AuthError, service::AuthService};
use crate::AppState;

/// Identity of the caller, attached to the request once its token checks out
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub email: String,
    pub role: String,
}

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MalformedHeader)?;

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

/// Validate the bearer token in `headers` and return the caller's identity
pub fn authenticate(
    headers: &HeaderMap,
    auth: &dyn AuthService,
) -> Result<AuthenticatedUser, AuthError> {
    let token = extract_bearer(headers)?;
    let claims = auth.check_token(token)?;

    Ok(AuthenticatedUser {
        email: claims.email,
        role: claims.role,
    })
}

/// Middleware guarding routes that need a valid token
///
/// On success the [`AuthenticatedUser`] is stored in the request extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let user = authenticate(request.headers(), state.auth.as_ref()).map_err(|e| {
        warn!("Rejected request to {}: {}", endpoint, e);
        e
    })?;

    debug!("Authenticated {} for {}", user.email, endpoint);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}
