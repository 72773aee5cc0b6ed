//! Player Routes - Account lifecycle and profile
//!
//! HTTP handlers that delegate to PlayerService for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use kaizen::catalog::PRESET_GOALS;

use crate::models::{OnboardingRequest, PlayerResponse, PresetGoalResponse};
use crate::routes::error_response;
use crate::AppState;

/// A freshly created account
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePlayerResponse {
    pub id: Uuid,
    pub player: PlayerResponse,
}

/// Create an account and complete onboarding with a first goal
#[utoipa::path(
    post,
    path = "/kaizen/players",
    request_body = OnboardingRequest,
    responses(
        (status = 200, description = "Account created", body = CreatePlayerResponse),
        (status = 422, description = "Empty goal label"),
        (status = 502, description = "Theme generation failed")
    ),
    tag = "Players"
)]
pub async fn create_player(
    State(state): State<AppState>,
    Json(payload): Json<OnboardingRequest>,
) -> Result<Json<CreatePlayerResponse>, (StatusCode, String)> {
    let id = Uuid::new_v4();
    let player = state
        .player_service
        .complete_onboarding(id, payload.goal, payload.context)
        .await
        .map_err(error_response)?;

    Ok(Json(CreatePlayerResponse {
        id,
        player: PlayerResponse::from_player(&player, false),
    }))
}

/// Get a player profile
#[utoipa::path(
    get,
    path = "/kaizen/players/{id}",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Player profile", body = PlayerResponse)
    ),
    tag = "Players"
)]
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerResponse>, (StatusCode, String)> {
    let profile = state
        .player_service
        .profile(id)
        .await
        .map_err(error_response)?;
    Ok(Json(PlayerResponse::from_player(
        &profile.player,
        profile.needs_onboarding,
    )))
}

/// Erase an account and all its documents
#[utoipa::path(
    delete,
    path = "/kaizen/players/{id}",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account erased"),
        (status = 404, description = "Unknown account")
    ),
    tag = "Players"
)]
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = state
        .player_service
        .delete_account(id)
        .await
        .map_err(error_response)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "unknown account".to_string()))
    }
}

/// List the preset onboarding goals
#[utoipa::path(
    get,
    path = "/kaizen/presets",
    responses(
        (status = 200, description = "Preset goals", body = Vec<PresetGoalResponse>)
    ),
    tag = "Players"
)]
pub async fn list_presets() -> Json<Vec<PresetGoalResponse>> {
    Json(PRESET_GOALS.iter().map(PresetGoalResponse::from).collect())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kaizen/players", axum::routing::post(create_player))
        .route(
            "/kaizen/players/:id",
            get(get_player).delete(delete_player),
        )
        .route("/kaizen/presets", get(list_presets))
}
