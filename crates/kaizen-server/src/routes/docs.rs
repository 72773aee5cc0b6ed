//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa, served as plain JSON.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::models::{
    AddCustomQuestRequest, AddGoalRequest, CelebrationResponse, CompleteResponse,
    DailyQuestsResponse, FeedbackRequest, GoalResponse, HistoryEntryResponse, OnboardingRequest,
    PlayerResponse, PresetGoalResponse, QuestResponse, StoryChapterResponse, ThemeResponse,
    TogglePinRequest, ToggleResponse, UndoResponse,
};

use super::players::CreatePlayerResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Player endpoints
        super::players::create_player,
        super::players::get_player,
        super::players::delete_player,
        super::players::list_presets,
        // Goal endpoints
        super::goals::add_goal,
        super::goals::archive_goal,
        super::goals::remove_goal,
        super::goals::toggle_pin,
        super::goals::toggle_premium,
        super::goals::use_streak_freeze,
        // Quest endpoints
        super::quests::get_quests,
        super::quests::generate_quests,
        super::quests::select_quest,
        super::quests::complete_quest,
        super::quests::undo_completion,
        super::quests::refresh_quest,
        super::quests::refresh_all_quests,
        super::quests::add_custom_quest,
        super::quests::set_feedback,
        // History endpoints
        super::history::get_history,
    ),
    components(schemas(
        PlayerResponse,
        CreatePlayerResponse,
        GoalResponse,
        ThemeResponse,
        StoryChapterResponse,
        OnboardingRequest,
        AddGoalRequest,
        TogglePinRequest,
        ToggleResponse,
        PresetGoalResponse,
        QuestResponse,
        DailyQuestsResponse,
        AddCustomQuestRequest,
        FeedbackRequest,
        CelebrationResponse,
        CompleteResponse,
        UndoResponse,
        HistoryEntryResponse,
    )),
    tags(
        (name = "Players", description = "Account lifecycle and profile"),
        (name = "Goals", description = "Goals, pins, premium, streak freeze"),
        (name = "Quests", description = "Daily quest lifecycle"),
        (name = "History", description = "Completion history")
    ),
    info(
        title = "Kaizen API",
        description = "Gamified personal development quest engine",
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn router<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}
