//! Dashboard notification feed.

use axum::extract::State;

use super::ApiResponse;
use crate::notify::Notification;
use crate::AppState;

/// GET /api/admin/notifications - Recent mutation notifications, newest first.
pub async fn list_notifications(State(state): State<AppState>) -> ApiResponse<Vec<Notification>> {
    ApiResponse::new(state.notifications.recent())
}
