//! Crate-level error types for the SDKWA gateway client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Alias for `Result<T, SdkwaError>`.
pub type SdkwaResult<T> = Result<T, SdkwaError>;

/// Uniform error type used across the crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkwaError {
    pub code: SdkwaErrorCode,
    pub message: String,
    /// Optional detail, usually the raw upstream body.
    pub details: Option<String>,
    /// HTTP status code if originated from an API call.
    pub http_status: Option<u16>,
}

impl fmt::Display for SdkwaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(status) = self.http_status {
            write!(f, " (HTTP {})", status)?;
        }
        if let Some(ref d) = self.details {
            write!(f, ": {}", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for SdkwaError {}

/// Categorised error codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SdkwaErrorCode {
    // ── Configuration ────────────────────────────────────
    InvalidConfig,
    NotConfigured,
    // ── API ──────────────────────────────────────────────
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    BadRequest,
    UpstreamError,
    // ── Webhooks ─────────────────────────────────────────
    MalformedPayload,
    HandlerFailed,
    // ── Internal ─────────────────────────────────────────
    NetworkError,
    SerializationError,
    InternalError,
}

impl SdkwaError {
    fn with_code(code: SdkwaErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            details: None,
            http_status: None,
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::with_code(SdkwaErrorCode::InvalidConfig, msg)
    }

    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::with_code(SdkwaErrorCode::NotConfigured, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::with_code(SdkwaErrorCode::NetworkError, msg)
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::with_code(SdkwaErrorCode::SerializationError, msg)
    }

    pub fn malformed_payload(msg: impl Into<String>) -> Self {
        Self::with_code(SdkwaErrorCode::MalformedPayload, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(SdkwaErrorCode::InternalError, msg)
    }

    /// A registered webhook handler reported a failure.
    pub fn handler_failed(tag: &str, source: impl fmt::Display) -> Self {
        Self {
            code: SdkwaErrorCode::HandlerFailed,
            message: format!("Handler for '{}' failed", tag),
            details: Some(source.to_string()),
            http_status: None,
        }
    }

    /// Build from a non-2xx gateway response.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        // The gateway returns: { "statusCode": 400, "timestamp": "...", "path": "...", "message": "..." }
        let message = Self::parse_gateway_message(body)
            .unwrap_or_else(|| format!("Gateway returned HTTP {}", status));
        let details = if body.is_empty() {
            None
        } else {
            Some(body.chars().take(500).collect())
        };
        Self {
            code: Self::classify_status(status),
            message,
            details,
            http_status: Some(status),
        }
    }

    fn parse_gateway_message(body: &str) -> Option<String> {
        let v: serde_json::Value = serde_json::from_str(body).ok()?;
        match &v["message"] {
            serde_json::Value::String(s) => Some(s.clone()),
            // validation errors come back as an array of messages
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|i| i.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        }
    }

    fn classify_status(status: u16) -> SdkwaErrorCode {
        match status {
            400 | 422 => SdkwaErrorCode::BadRequest,
            401 => SdkwaErrorCode::Unauthorized,
            403 => SdkwaErrorCode::Forbidden,
            404 => SdkwaErrorCode::NotFound,
            429 => SdkwaErrorCode::RateLimited,
            _ => SdkwaErrorCode::UpstreamError,
        }
    }
}

impl From<reqwest::Error> for SdkwaError {
    fn from(e: reqwest::Error) -> Self {
        SdkwaError::network(e.to_string())
    }
}

impl From<serde_json::Error> for SdkwaError {
    fn from(e: serde_json::Error) -> Self {
        SdkwaError::serialization(e.to_string())
    }
}
