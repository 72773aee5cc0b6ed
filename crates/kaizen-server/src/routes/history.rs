//! History Routes - Completion history

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::models::HistoryEntryResponse;
use crate::routes::error_response;
use crate::AppState;

/// Full completion history, newest first
#[utoipa::path(
    get,
    path = "/kaizen/players/{id}/history",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Completion history", body = Vec<HistoryEntryResponse>)
    ),
    tag = "History"
)]
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<HistoryEntryResponse>>, (StatusCode, String)> {
    let entries = state
        .quest_service
        .history(id)
        .await
        .map_err(error_response)?;
    Ok(Json(
        entries.iter().map(HistoryEntryResponse::from).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/kaizen/players/:id/history", get(get_history))
}
