//! REST API module.
//!
//! Reads and mutations go through the dashboard data layer so every response reflects
//! the same cache and notification behavior the dashboard sees.

mod auth;
mod events;
mod news;
mod notifications;
mod resources;
mod site_config;

pub use auth::*;
pub use events::*;
pub use news::*;
pub use notifications::*;
pub use resources::*;
pub use site_config::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::admin_data::MutationOutcome;
use crate::cache::QueryView;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Envelope for cached reads, carrying the loading and error flags alongside the data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub view: QueryView<T>,
}

impl<T: Serialize> From<QueryView<T>> for QueryResponse<T> {
    fn from(view: QueryView<T>) -> Self {
        Self {
            success: true,
            view,
        }
    }
}

impl<T: Serialize> IntoResponse for QueryResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// A settled mutation. Store failures answer 500 with the error notification.
#[derive(Debug)]
pub struct MutationResponse(pub MutationOutcome);

impl IntoResponse for MutationResponse {
    fn into_response(self) -> Response {
        let status = if self.0.success {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(self.0)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<T, crate::errors::AppError>;
