//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;

use crate::web::state::AppState;

/// The authenticated caller, inserted into request extensions by
/// [`require_auth`] and extracted by handlers via `Extension<AuthUser>`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Parses the `session=` value out of a Cookie header.
pub fn session_cookie(cookie_header: &str) -> Option<&str> {
    cookie_header.split(';').find_map(|c| {
        let c = c.trim();
        c.strip_prefix("session=")
    })
}

/// Middleware that validates the auth session cookie and extracts the user id.
///
/// If valid, inserts an [`AuthUser`] into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let auth_session_id = session_cookie(cookie_header).ok_or(StatusCode::UNAUTHORIZED)?;

    let user_id = state
        .store
        .validate_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to validate auth session: {:?}", e);
            StatusCode::UNAUTHORIZED
        })?;

    req.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::session_cookie;

    #[test]
    fn finds_session_among_other_cookies() {
        assert_eq!(
            session_cookie("theme=dark; session=abc-123; lang=en"),
            Some("abc-123")
        );
        assert_eq!(session_cookie("session=xyz"), Some("xyz"));
        assert_eq!(session_cookie("theme=dark"), None);
    }
}
