//! Event API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResult, MutationResponse, QueryResponse};
use crate::models::{Event, EventDraft};
use crate::AppState;

/// GET /api/events - List all events.
pub async fn list_events(State(state): State<AppState>) -> QueryResponse<Vec<Event>> {
    state.data.events.read().await.into()
}

/// POST /api/events - Create a new event.
pub async fn create_event(
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> ApiResult<MutationResponse> {
    draft.validate()?;
    Ok(MutationResponse(state.data.events.create(&draft).await))
}

/// PUT /api/events/:id - Replace an event's fields.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<EventDraft>,
) -> ApiResult<MutationResponse> {
    draft.validate()?;
    let event = draft.with_id(id);
    Ok(MutationResponse(state.data.events.update(&event).await))
}

/// DELETE /api/events/:id - Delete an event.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> MutationResponse {
    MutationResponse(state.data.events.delete(&id).await)
}
