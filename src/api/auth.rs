//! Admin login and session endpoints.

use axum::{extract::State, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::auth::bearer_token;
use crate::store::AuthResult;
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// POST /api/auth/login - Exchange admin credentials for a session token.
///
/// Rejected credentials are a normal outcome and still answer 200 with `success: false`.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Json<AuthResult> {
    Json(
        state
            .store
            .authenticate(request.username.trim(), &request.password)
            .await,
    )
}

/// GET /api/auth/session - Whether the presented bearer token is a live admin session.
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResponse<SessionStatus> {
    let session = bearer_token(&headers).and_then(|t| state.store.tokens().verify(t).ok());

    ApiResponse::new(match session {
        Some(session) => SessionStatus {
            authenticated: true,
            username: Some(session.username),
            expires_at: Some(session.expires_at),
        },
        None => SessionStatus {
            authenticated: false,
            username: None,
            expires_at: None,
        },
    })
}
