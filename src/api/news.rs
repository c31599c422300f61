//! News API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResult, MutationResponse, QueryResponse};
use crate::models::{NewsDraft, NewsItem};
use crate::AppState;

/// GET /api/news - List all news items.
pub async fn list_news(State(state): State<AppState>) -> QueryResponse<Vec<NewsItem>> {
    state.data.news.read().await.into()
}

/// POST /api/news - Create a news item.
pub async fn create_news(
    State(state): State<AppState>,
    Json(draft): Json<NewsDraft>,
) -> ApiResult<MutationResponse> {
    draft.validate()?;
    Ok(MutationResponse(state.data.news.create(&draft).await))
}

/// PUT /api/news/:id - Replace a news item's fields.
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<NewsDraft>,
) -> ApiResult<MutationResponse> {
    draft.validate()?;
    let item = draft.with_id(id);
    Ok(MutationResponse(state.data.news.update(&item).await))
}

/// DELETE /api/news/:id - Delete a news item.
pub async fn delete_news(State(state): State<AppState>, Path(id): Path<String>) -> MutationResponse {
    MutationResponse(state.data.news.delete(&id).await)
}
