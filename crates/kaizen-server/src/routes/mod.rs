//! Kaizen API Routes
//!
//! - /kaizen/players - account lifecycle and profile
//! - /kaizen/players/:id/goals - goal management
//! - /kaizen/players/:id/quests - the daily quest lifecycle
//! - /kaizen/players/:id/history - completion history
//! - /api-docs/openapi.json - OpenAPI document

pub mod docs;
pub mod goals;
pub mod history;
pub mod players;
pub mod quests;

use axum::http::StatusCode;
use kaizen::DomainError;

/// Map a domain error onto an HTTP status + message pair
pub(crate) fn error_response(e: DomainError) -> (StatusCode, String) {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::ExternalService(_) => StatusCode::BAD_GATEWAY,
    };
    (status, e.to_string())
}
