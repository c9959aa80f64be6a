//! axum endpoint that feeds gateway webhook POSTs into [`WaWebhooks`].

use crate::whatsapp::error::{SdkwaError, SdkwaErrorCode};
use crate::whatsapp::webhooks::WaWebhooks;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::warn;
use std::sync::Arc;

/// Router with a single `POST {path}` route dispatching to `webhooks`.
///
/// A dispatched (or ignored) notification is answered with an empty
/// `200`. Malformed bodies get a `400`, handler failures a `500`.
pub fn webhook_router(webhooks: Arc<WaWebhooks>, path: &str) -> Router {
    Router::new()
        .route(path, post(receive_webhook))
        .with_state(webhooks)
}

async fn receive_webhook(
    State(webhooks): State<Arc<WaWebhooks>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<StatusCode, SdkwaError> {
    match webhooks.dispatch(payload) {
        Ok(_) => Ok(StatusCode::OK),
        Err(e) => {
            warn!("Webhook dispatch failed: {}", e);
            Err(e)
        }
    }
}

impl SdkwaErrorCode {
    /// HTTP status used when this error is returned from an axum handler.
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::MalformedPayload | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::UpstreamError | Self::NetworkError => StatusCode::BAD_GATEWAY,
            Self::InvalidConfig
            | Self::NotConfigured
            | Self::HandlerFailed
            | Self::SerializationError
            | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SdkwaError {
    fn into_response(self) -> Response {
        (self.code.status_code(), Json(self)).into_response()
    }
}
