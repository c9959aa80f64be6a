//! HTTP client for the SDKWA gateway.
//!
//! Builds instance-scoped URLs, injects the instance token, and maps
//! non-2xx responses to [`SdkwaError`]. Every call is a single request;
//! transport and upstream errors are returned to the caller unmodified.

use crate::whatsapp::error::{SdkwaError, SdkwaResult};
use crate::whatsapp::types::{WaAuthMode, WaConfig};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{multipart, Method};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Low-level HTTP client for one gateway instance.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    config: WaConfig,
}

impl GatewayClient {
    /// Create a new client from configuration.
    pub fn new(config: &WaConfig) -> SdkwaResult<Self> {
        config.validate()?;
        Self::build(config)
    }

    /// Client for user-level calls only; instance credentials may be blank.
    pub fn for_user(config: &WaConfig) -> SdkwaResult<Self> {
        config.validate_user_level()?;
        Self::build(config)
    }

    fn build(config: &WaConfig) -> SdkwaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec as u64))
            .connect_timeout(Duration::from_secs(config.connect_timeout_sec as u64))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| SdkwaError::network(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Get current config reference.
    pub fn config(&self) -> &WaConfig {
        &self.config
    }

    // ─── URL helpers ─────────────────────────────────────────────────

    /// Instance-scoped URL: `{host}/whatsapp/{idInstance}/{operation}`.
    pub fn url(&self, operation: &str) -> String {
        self.url_with(operation, None)
    }

    /// Instance-scoped URL with a trailing path segment, e.g.
    /// `deleteNotification/{receiptId}`.
    ///
    /// In [`WaAuthMode::PathToken`] the token sits between the operation
    /// and the suffix.
    pub fn url_with(&self, operation: &str, suffix: Option<&str>) -> String {
        let mut url = format!(
            "{}/whatsapp/{}/{}",
            self.config.base_url(),
            self.config.id_instance,
            operation
        );
        if self.config.auth_mode == WaAuthMode::PathToken {
            url.push('/');
            url.push_str(&self.config.api_token_instance);
        }
        if let Some(s) = suffix {
            url.push('/');
            url.push_str(s);
        }
        url
    }

    /// User-level URL: `{host}/api/v1/instance/user/{path}`.
    pub fn user_url(&self, path: &str) -> String {
        format!("{}/api/v1/instance/user/{}", self.config.base_url(), path)
    }

    // ─── HTTP primitives ─────────────────────────────────────────────

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if self.config.auth_mode == WaAuthMode::Bearer {
            if let Ok(v) =
                HeaderValue::from_str(&format!("Bearer {}", self.config.api_token_instance))
            {
                headers.insert(AUTHORIZATION, v);
            }
        }
        headers
    }

    fn user_headers(&self) -> SdkwaResult<HeaderMap> {
        let (user_id, user_token) = self.config.user_credentials().ok_or_else(|| {
            SdkwaError::not_configured("userId and userToken are required for instance management")
        })?;

        let mut headers = HeaderMap::new();
        let id = HeaderValue::from_str(user_id)
            .map_err(|e| SdkwaError::invalid_config(format!("Invalid userId: {}", e)))?;
        let token = HeaderValue::from_str(user_token)
            .map_err(|e| SdkwaError::invalid_config(format!("Invalid userToken: {}", e)))?;
        headers.insert("x-user-id", id);
        headers.insert("x-user-token", token);
        Ok(headers)
    }

    /// GET an instance operation.
    pub async fn get(&self, operation: &str) -> SdkwaResult<serde_json::Value> {
        self.request(Method::GET, &self.url(operation), None).await
    }

    /// GET an instance operation carrying a JSON body.
    pub async fn get_with_body(
        &self,
        operation: &str,
        body: &serde_json::Value,
    ) -> SdkwaResult<serde_json::Value> {
        self.request(Method::GET, &self.url(operation), Some(body))
            .await
    }

    /// POST a JSON body to an instance operation.
    pub async fn post_json(
        &self,
        operation: &str,
        body: &serde_json::Value,
    ) -> SdkwaResult<serde_json::Value> {
        self.request(Method::POST, &self.url(operation), Some(body))
            .await
    }

    /// DELETE an instance operation with a trailing path segment.
    pub async fn delete(&self, operation: &str, suffix: &str) -> SdkwaResult<serde_json::Value> {
        self.request(Method::DELETE, &self.url_with(operation, Some(suffix)), None)
            .await
    }

    /// POST a multipart form (file uploads).
    pub async fn post_multipart(
        &self,
        operation: &str,
        form: multipart::Form,
    ) -> SdkwaResult<serde_json::Value> {
        let url = self.url(operation);
        debug!("POST multipart {}", url);

        let req = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .multipart(form);
        Self::execute(req).await
    }

    /// POST a JSON body to a user-level endpoint with `x-user-*` headers.
    pub async fn post_user(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> SdkwaResult<serde_json::Value> {
        let headers = self.user_headers()?;
        let url = self.user_url(path);
        debug!("POST {}", url);

        let mut req = self.client.post(&url).headers(headers);
        req = match body {
            Some(b) => req.json(b),
            None => req.json(&serde_json::json!({})),
        };
        Self::execute(req).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> SdkwaResult<serde_json::Value> {
        debug!("{} {}", method, url);

        let mut req = self
            .client
            .request(method, url)
            .headers(self.auth_headers());
        if let Some(b) = body {
            req = req.json(b);
        }
        Self::execute(req).await
    }

    async fn execute(req: reqwest::RequestBuilder) -> SdkwaResult<serde_json::Value> {
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| SdkwaError::network(format!("Reading response failed: {}", e)))?;

        if !(200..300).contains(&status) {
            return Err(SdkwaError::from_api_response(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(serde_json::json!({}));
        }
        serde_json::from_str(&body)
            .map_err(|e| SdkwaError::serialization(format!("JSON parse error: {}", e)))
    }
}

/// Decode a gateway response into a typed body.
pub(crate) fn decode<T: DeserializeOwned>(value: serde_json::Value) -> SdkwaResult<T> {
    serde_json::from_value(value)
        .map_err(|e| SdkwaError::serialization(format!("Unexpected response shape: {}", e)))
}
