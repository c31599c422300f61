//! Resource API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResult, MutationResponse, QueryResponse};
use crate::models::{Resource, ResourceDraft};
use crate::AppState;

/// GET /api/resources - List all resources.
pub async fn list_resources(State(state): State<AppState>) -> QueryResponse<Vec<Resource>> {
    state.data.resources.read().await.into()
}

/// POST /api/resources - Create a resource.
pub async fn create_resource(
    State(state): State<AppState>,
    Json(draft): Json<ResourceDraft>,
) -> ApiResult<MutationResponse> {
    draft.validate()?;
    Ok(MutationResponse(state.data.resources.create(&draft).await))
}

/// PUT /api/resources/:id - Replace a resource's fields.
pub async fn update_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ResourceDraft>,
) -> ApiResult<MutationResponse> {
    draft.validate()?;
    let resource = draft.with_id(id);
    Ok(MutationResponse(state.data.resources.update(&resource).await))
}

/// DELETE /api/resources/:id - Delete a resource.
pub async fn delete_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> MutationResponse {
    MutationResponse(state.data.resources.delete(&id).await)
}
