//! Site configuration endpoints.

use axum::{extract::State, Json};

use super::{ApiResult, MutationResponse, QueryResponse};
use crate::errors::AppError;
use crate::models::{SiteConfig, SiteConfigPatch};
use crate::AppState;

/// GET /api/site-config - The current configuration, or the default if none is stored.
pub async fn get_site_config(State(state): State<AppState>) -> QueryResponse<SiteConfig> {
    state.data.site_config.read().await.into()
}

/// PATCH /api/site-config - Merge the supplied fields onto the stored configuration.
pub async fn update_site_config(
    State(state): State<AppState>,
    Json(patch): Json<SiteConfigPatch>,
) -> ApiResult<MutationResponse> {
    if patch.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    patch.validate()?;

    Ok(MutationResponse(state.data.site_config.update(&patch).await))
}
