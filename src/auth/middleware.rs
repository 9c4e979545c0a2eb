//! Authentication middleware
//!
//! Protects routes that require authentication.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use super::tokens::verify_access_token;
use crate::data::User;
use crate::error::AppError;
use crate::AppState;

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
}

/// Verify the bearer token and load the user it names.
///
/// A valid signature over a deleted user is still `Unauthorized`.
async fn authenticate_token(token: &str, state: &AppState) -> Result<User, AppError> {
    let claims = verify_access_token(token, &state.config.auth.token_secret)?;

    state
        .db
        .get_user(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Middleware to require authentication
///
/// Extracts and verifies the bearer access token from the
/// Authorization header. Adds the User to request extensions if valid.
///
/// # Usage
/// ```ignore
/// let protected_routes = Router::new()
///     .route("/playlists", ...)
///     .route_layer(middleware::from_fn_with_state(state, require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token_from_headers(request.headers()).ok_or(AppError::Unauthorized)?;

    let user = authenticate_token(&token, &state).await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extractor for the current authenticated user
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>().cloned() {
            return Ok(CurrentUser(user));
        }

        let app_state = AppState::from_ref(state);
        let token = extract_token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user = authenticate_token(&token, &app_state).await?;
        parts.extensions.insert(user.clone());

        Ok(CurrentUser(user))
    }
}

/// Optional current user extractor
///
/// Returns None if not authenticated, instead of error.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>().cloned() {
            return Ok(MaybeUser(Some(user)));
        }

        let app_state = AppState::from_ref(state);
        let user = match extract_token_from_headers(&parts.headers) {
            Some(token) => authenticate_token(&token, &app_state).await.ok(),
            None => None,
        };

        if let Some(user) = &user {
            parts.extensions.insert(user.clone());
        }

        Ok(MaybeUser(user))
    }
}
