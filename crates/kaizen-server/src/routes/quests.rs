//! Quest Routes - The daily quest lifecycle
//!
//! HTTP handlers that delegate to QuestService for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use kaizen::{Category, Feedback};

use crate::models::{
    AddCustomQuestRequest, CompleteResponse, DailyQuestsResponse, FeedbackRequest, UndoResponse,
};
use crate::routes::error_response;
use crate::AppState;

/// Today's quest batch, after the daily reset check
#[utoipa::path(
    get,
    path = "/kaizen/players/{id}/quests",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Today's batch (possibly empty)", body = DailyQuestsResponse)
    ),
    tag = "Quests"
)]
pub async fn get_quests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DailyQuestsResponse>, (StatusCode, String)> {
    let daily = state.quest_service.today(id).await.map_err(error_response)?;
    Ok(Json(DailyQuestsResponse::from(&daily)))
}

/// Generate a fresh batch for today
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/quests/generate",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Generated batch", body = DailyQuestsResponse),
        (status = 502, description = "Generation failed")
    ),
    tag = "Quests"
)]
pub async fn generate_quests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DailyQuestsResponse>, (StatusCode, String)> {
    let daily = state
        .quest_service
        .generate(id)
        .await
        .map_err(error_response)?;
    Ok(Json(DailyQuestsResponse::from(&daily)))
}

/// Choose the quest of the day
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/quests/{quest_id}/select",
    params(
        ("id" = Uuid, Path, description = "Account id"),
        ("quest_id" = Uuid, Path, description = "Quest id")
    ),
    responses(
        (status = 200, description = "Updated batch", body = DailyQuestsResponse),
        (status = 404, description = "Unknown quest"),
        (status = 409, description = "A quest is already selected")
    ),
    tag = "Quests"
)]
pub async fn select_quest(
    State(state): State<AppState>,
    Path((id, quest_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DailyQuestsResponse>, (StatusCode, String)> {
    let daily = state
        .quest_service
        .select(id, quest_id)
        .await
        .map_err(error_response)?;
    Ok(Json(DailyQuestsResponse::from(&daily)))
}

/// Complete a quest; returns the celebrations to display
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/quests/{quest_id}/complete",
    params(
        ("id" = Uuid, Path, description = "Account id"),
        ("quest_id" = Uuid, Path, description = "Quest id")
    ),
    responses(
        (status = 200, description = "Completion result; applied=false for invalid local state", body = CompleteResponse)
    ),
    tag = "Quests"
)]
pub async fn complete_quest(
    State(state): State<AppState>,
    Path((id, quest_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CompleteResponse>, (StatusCode, String)> {
    let result = state
        .quest_service
        .complete(id, quest_id)
        .await
        .map_err(error_response)?;
    Ok(Json(CompleteResponse::from(result)))
}

/// Roll back the latest completion if its window is still open
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/quests/undo",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Whether a rollback happened", body = UndoResponse)
    ),
    tag = "Quests"
)]
pub async fn undo_completion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UndoResponse>, (StatusCode, String)> {
    let restored = state.quest_service.undo(id).await.map_err(error_response)?;
    Ok(Json(UndoResponse { restored }))
}

/// Replace one slot with a fresh quest (premium)
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/quests/{quest_id}/refresh",
    params(
        ("id" = Uuid, Path, description = "Account id"),
        ("quest_id" = Uuid, Path, description = "Quest id")
    ),
    responses(
        (status = 200, description = "Updated batch", body = DailyQuestsResponse),
        (status = 409, description = "Slot not replaceable"),
        (status = 422, description = "Not a premium account"),
        (status = 429, description = "Refresh quota reached")
    ),
    tag = "Quests"
)]
pub async fn refresh_quest(
    State(state): State<AppState>,
    Path((id, quest_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DailyQuestsResponse>, (StatusCode, String)> {
    let daily = state
        .quest_service
        .refresh_single(id, quest_id)
        .await
        .map_err(error_response)?;
    Ok(Json(DailyQuestsResponse::from(&daily)))
}

/// Regenerate the whole batch
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/quests/refresh-all",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Regenerated batch", body = DailyQuestsResponse),
        (status = 429, description = "Refresh quota reached")
    ),
    tag = "Quests"
)]
pub async fn refresh_all_quests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DailyQuestsResponse>, (StatusCode, String)> {
    let daily = state
        .quest_service
        .refresh_all(id)
        .await
        .map_err(error_response)?;
    Ok(Json(DailyQuestsResponse::from(&daily)))
}

/// Add a user-written quest to today's batch
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/quests",
    params(("id" = Uuid, Path, description = "Account id")),
    request_body = AddCustomQuestRequest,
    responses(
        (status = 200, description = "Updated batch", body = DailyQuestsResponse),
        (status = 422, description = "Empty title or unknown category")
    ),
    tag = "Quests"
)]
pub async fn add_custom_quest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddCustomQuestRequest>,
) -> Result<Json<DailyQuestsResponse>, (StatusCode, String)> {
    let category = payload
        .category
        .map(|c| c.parse::<Category>())
        .transpose()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e))?;
    let daily = state
        .quest_service
        .add_custom(id, payload.title, category)
        .await
        .map_err(error_response)?;
    Ok(Json(DailyQuestsResponse::from(&daily)))
}

/// Thumbs up or down on a quest
#[utoipa::path(
    post,
    path = "/kaizen/players/{id}/quests/{quest_id}/feedback",
    params(
        ("id" = Uuid, Path, description = "Account id"),
        ("quest_id" = Uuid, Path, description = "Quest id")
    ),
    request_body = FeedbackRequest,
    responses(
        (status = 204, description = "Feedback recorded"),
        (status = 404, description = "Unknown quest"),
        (status = 422, description = "Unknown feedback value")
    ),
    tag = "Quests"
)]
pub async fn set_feedback(
    State(state): State<AppState>,
    Path((id, quest_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let feedback = payload
        .feedback
        .parse::<Feedback>()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e))?;
    state
        .quest_service
        .set_feedback(id, quest_id, feedback)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/kaizen/players/:id/quests",
            get(get_quests).post(add_custom_quest),
        )
        .route("/kaizen/players/:id/quests/generate", post(generate_quests))
        .route("/kaizen/players/:id/quests/undo", post(undo_completion))
        .route(
            "/kaizen/players/:id/quests/refresh-all",
            post(refresh_all_quests),
        )
        .route(
            "/kaizen/players/:id/quests/:quest_id/select",
            post(select_quest),
        )
        .route(
            "/kaizen/players/:id/quests/:quest_id/complete",
            post(complete_quest),
        )
        .route(
            "/kaizen/players/:id/quests/:quest_id/refresh",
            post(refresh_quest),
        )
        .route(
            "/kaizen/players/:id/quests/:quest_id/feedback",
            post(set_feedback),
        )
}
