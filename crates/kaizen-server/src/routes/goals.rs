//! Goal Routes - Goals, pins, premium and streak freeze
//!
//! HTTP handlers that delegate to PlayerService for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::models::{AddGoalRequest, PlayerResponse, TogglePinRequest, ToggleResponse};
use crate::routes::error_response;
use crate::AppState;

/// Add a goal; its themes come from the generator
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/goals",
    params(("id" = Uuid, Path, description = "Account id")),
    request_body = AddGoalRequest,
    responses(
        (status = 200, description = "Updated player", body = PlayerResponse),
        (status = 502, description = "Theme generation failed")
    ),
    tag = "Goals"
)]
pub async fn add_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddGoalRequest>,
) -> Result<Json<PlayerResponse>, (StatusCode, String)> {
    let player = state
        .player_service
        .add_goal(id, payload.label, payload.context)
        .await
        .map_err(error_response)?;
    Ok(Json(PlayerResponse::from_player(&player, false)))
}

/// Archive a goal (soft-delete, leaves active rotation)
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/goals/{goal_id}/archive",
    params(
        ("id" = Uuid, Path, description = "Account id"),
        ("goal_id" = Uuid, Path, description = "Goal id")
    ),
    responses(
        (status = 200, description = "Updated player", body = PlayerResponse),
        (status = 404, description = "Unknown goal")
    ),
    tag = "Goals"
)]
pub async fn archive_goal(
    State(state): State<AppState>,
    Path((id, goal_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PlayerResponse>, (StatusCode, String)> {
    let player = state
        .player_service
        .archive_goal(id, goal_id)
        .await
        .map_err(error_response)?;
    Ok(Json(PlayerResponse::from_player(&player, false)))
}

/// Remove a goal permanently
#[utoipa::path(
    delete,
    path = "/kaizen/players/{id}/goals/{goal_id}",
    params(
        ("id" = Uuid, Path, description = "Account id"),
        ("goal_id" = Uuid, Path, description = "Goal id")
    ),
    responses(
        (status = 200, description = "Updated player", body = PlayerResponse),
        (status = 404, description = "Unknown goal")
    ),
    tag = "Goals"
)]
pub async fn remove_goal(
    State(state): State<AppState>,
    Path((id, goal_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PlayerResponse>, (StatusCode, String)> {
    let player = state
        .player_service
        .remove_goal(id, goal_id)
        .await
        .map_err(error_response)?;
    Ok(Json(PlayerResponse::from_player(&player, false)))
}

/// Pin or unpin a quest title for recurring generation
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/pins",
    params(("id" = Uuid, Path, description = "Account id")),
    request_body = TogglePinRequest,
    responses(
        (status = 200, description = "New pinned state", body = ToggleResponse)
    ),
    tag = "Goals"
)]
pub async fn toggle_pin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TogglePinRequest>,
) -> Result<Json<ToggleResponse>, (StatusCode, String)> {
    let enabled = state
        .player_service
        .toggle_pinned(id, payload.title)
        .await
        .map_err(error_response)?;
    Ok(Json(ToggleResponse { enabled }))
}

/// Flip the premium flag
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/premium",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "New premium state", body = ToggleResponse)
    ),
    tag = "Goals"
)]
pub async fn toggle_premium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, (StatusCode, String)> {
    let enabled = state
        .player_service
        .toggle_premium(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ToggleResponse { enabled }))
}

/// Spend the weekly streak freeze on today
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/streak-freeze",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Updated player", body = PlayerResponse),
        (status = 422, description = "Not a premium account"),
        (status = 429, description = "Already used this week")
    ),
    tag = "Goals"
)]
pub async fn use_streak_freeze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerResponse>, (StatusCode, String)> {
    let player = state
        .player_service
        .use_streak_freeze(id)
        .await
        .map_err(error_response)?;
    Ok(Json(PlayerResponse::from_player(&player, false)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kaizen/players/:id/goals", post(add_goal))
        .route(
            "/kaizen/players/:id/goals/:goal_id",
            axum::routing::delete(remove_goal),
        )
        .route(
            "/kaizen/players/:id/goals/:goal_id/archive",
            post(archive_goal),
        )
        .route("/kaizen/players/:id/pins", post(toggle_pin))
        .route("/kaizen/players/:id/premium", post(toggle_premium))
        .route("/kaizen/players/:id/streak-freeze", post(use_streak_freeze))
}
