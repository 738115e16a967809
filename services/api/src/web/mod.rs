pub mod analytics;
pub mod auth;
pub mod friends;
pub mod goals;
pub mod middleware;
pub mod pomodoro;
pub mod rest;
pub mod sessions;
pub mod state;

use axum::http::StatusCode;
use study_tracker_core::ports::PortError;
use tracing::error;

pub use middleware::require_auth;

/// Maps the core error taxonomy onto HTTP statuses at the handler boundary.
/// Infrastructure failures are logged here and reported as opaque 500s.
pub fn port_error_response(e: PortError) -> (StatusCode, String) {
    let status = match &e {
        PortError::Validation(_) => StatusCode::BAD_REQUEST,
        PortError::DuplicateIdentity(_) => StatusCode::CONFLICT,
        PortError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::Conflict(_) | PortError::InvalidTransition(_) => StatusCode::CONFLICT,
        PortError::Infrastructure(detail) => {
            error!("Store failure: {}", detail);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            );
        }
    };
    (status, e.to_string())
}
