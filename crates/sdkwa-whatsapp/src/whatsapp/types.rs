//! Shared types for the SDKWA gateway client.
//!
//! Covers configuration, request parameters for every REST operation, and
//! the typed response bodies the gateway documents. Operations whose
//! responses the gateway leaves open return `serde_json::Value` instead.

use crate::whatsapp::error::{SdkwaError, SdkwaResult};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
//  Configuration
// ═══════════════════════════════════════════════════════════════════════

pub const DEFAULT_API_HOST: &str = "https://api.sdkwa.pro";

/// How the instance token is presented to the gateway.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WaAuthMode {
    /// `Authorization: Bearer {apiTokenInstance}` on `/whatsapp/{id}/{op}`.
    #[default]
    Bearer,
    /// Older interface shape: `/whatsapp/{id}/{op}/{apiTokenInstance}`.
    PathToken,
}

/// Connection settings for one gateway instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaConfig {
    /// Gateway base URL. A trailing `/` is ignored.
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// Instance identifier embedded in every instance-scoped path.
    pub id_instance: String,
    /// Instance API token.
    pub api_token_instance: String,
    /// Account id for user-level instance management.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Account token for user-level instance management.
    #[serde(default)]
    pub user_token: Option<String>,
    #[serde(default)]
    pub auth_mode: WaAuthMode,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_sec: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_sec: u32,
    /// Skip TLS certificate verification (self-hosted gateways).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}
fn default_timeout() -> u32 {
    30
}
fn default_connect_timeout() -> u32 {
    15
}

impl WaConfig {
    pub fn new(id_instance: impl Into<String>, api_token_instance: impl Into<String>) -> Self {
        Self {
            api_host: default_api_host(),
            id_instance: id_instance.into(),
            api_token_instance: api_token_instance.into(),
            user_id: None,
            user_token: None,
            auth_mode: WaAuthMode::default(),
            timeout_sec: default_timeout(),
            connect_timeout_sec: default_connect_timeout(),
            accept_invalid_certs: false,
        }
    }

    /// Account-level config for instance management only. No instance id
    /// or token is set, so instance-scoped calls are unavailable.
    pub fn for_user(user_id: impl Into<String>, user_token: impl Into<String>) -> Self {
        Self::new("", "").with_user_credentials(user_id, user_token)
    }

    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    pub fn with_user_credentials(
        mut self,
        user_id: impl Into<String>,
        user_token: impl Into<String>,
    ) -> Self {
        self.user_id = Some(user_id.into());
        self.user_token = Some(user_token.into());
        self
    }

    pub fn with_auth_mode(mut self, mode: WaAuthMode) -> Self {
        self.auth_mode = mode;
        self
    }

    /// Load from `API_HOST`, `ID_INSTANCE`, `API_TOKEN_INSTANCE`, `USER_ID`
    /// and `USER_TOKEN`.
    pub fn from_env() -> SdkwaResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`WaConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> SdkwaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let id_instance = non_empty("ID_INSTANCE")
            .ok_or_else(|| SdkwaError::invalid_config("ID_INSTANCE is not set"))?;
        let api_token_instance = non_empty("API_TOKEN_INSTANCE")
            .ok_or_else(|| SdkwaError::invalid_config("API_TOKEN_INSTANCE is not set"))?;

        let mut config = Self::new(id_instance, api_token_instance);
        if let Some(host) = non_empty("API_HOST") {
            config.api_host = host;
        }
        config.user_id = non_empty("USER_ID");
        config.user_token = non_empty("USER_TOKEN");
        config.validate()?;
        Ok(config)
    }

    /// Load an account-level config from `API_HOST`, `USER_ID` and
    /// `USER_TOKEN`.
    pub fn user_from_env() -> SdkwaResult<Self> {
        Self::user_from_lookup(|key| std::env::var(key).ok())
    }

    pub fn user_from_lookup<F>(lookup: F) -> SdkwaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let user_id = non_empty("USER_ID")
            .ok_or_else(|| SdkwaError::invalid_config("USER_ID is not set"))?;
        let user_token = non_empty("USER_TOKEN")
            .ok_or_else(|| SdkwaError::invalid_config("USER_TOKEN is not set"))?;

        let mut config = Self::for_user(user_id, user_token);
        if let Some(host) = non_empty("API_HOST") {
            config.api_host = host;
        }
        config.validate_user_level()?;
        Ok(config)
    }

    /// Reject blank instance credentials and unusable hosts.
    pub fn validate(&self) -> SdkwaResult<()> {
        if self.id_instance.trim().is_empty() {
            return Err(SdkwaError::invalid_config(
                "idInstance is required and must be non-empty",
            ));
        }
        if self.api_token_instance.trim().is_empty() {
            return Err(SdkwaError::invalid_config(
                "apiTokenInstance is required and must be non-empty",
            ));
        }
        self.validate_host()
    }

    /// Reject missing user credentials and unusable hosts. Instance
    /// credentials are not checked.
    pub fn validate_user_level(&self) -> SdkwaResult<()> {
        if self.user_credentials().is_none() {
            return Err(SdkwaError::invalid_config(
                "userId and userToken are required and must be non-empty",
            ));
        }
        self.validate_host()
    }

    fn validate_host(&self) -> SdkwaResult<()> {
        url::Url::parse(self.base_url())
            .map_err(|e| SdkwaError::invalid_config(format!("Invalid apiHost: {}", e)))?;
        Ok(())
    }

    /// `api_host` without its trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_host.trim_end_matches('/')
    }

    /// User-level credentials, if both are present.
    pub fn user_credentials(&self) -> Option<(&str, &str)> {
        match (self.user_id.as_deref(), self.user_token.as_deref()) {
            (Some(id), Some(token)) if !id.trim().is_empty() && !token.trim().is_empty() => {
                Some((id, token))
            }
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Account
// ═══════════════════════════════════════════════════════════════════════

/// Instance settings, including webhook subscriptions.
///
/// Unknown keys round-trip through `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_send_messages_milliseconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_incoming_messages_readed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_incoming_messages_readed_on_reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outgoing_webhook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outgoing_message_webhook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_webhook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incoming_webhook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_webhook: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSaveSettingsResponse {
    #[serde(default)]
    pub save_settings: bool,
}

/// Authorization state of an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WaInstanceState {
    NotAuthorized,
    Authorized,
    Blocked,
    SleepMode,
    Starting,
    YellowCard,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaStateInstanceResponse {
    pub state_instance: WaInstanceState,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaRebootResponse {
    #[serde(default)]
    pub is_reboot: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaLogoutResponse {
    #[serde(default)]
    pub is_logout: bool,
}

/// QR code or status message returned by `qr`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaQrResponse {
    /// `qrCode`, `alreadyLogged` or `error`.
    #[serde(rename = "type")]
    pub qr_type: String,
    /// Base64 PNG for `qrCode`, human-readable text otherwise.
    pub message: String,
}

impl WaQrResponse {
    pub fn is_qr_code(&self) -> bool {
        self.qr_type == "qrCode"
    }

    /// Decode the QR image. Fails when the response is not a QR code.
    pub fn png_bytes(&self) -> SdkwaResult<Vec<u8>> {
        if !self.is_qr_code() {
            return Err(SdkwaError::internal(format!(
                "No QR code in response ({}): {}",
                self.qr_type, self.message
            )));
        }
        base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &self.message)
            .map_err(|e| SdkwaError::serialization(format!("Invalid QR base64: {}", e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaAuthorizationCodeResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub code: String,
}

/// Delivery channel for a registration code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WaRegistrationMethod {
    Sms,
    Voice,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSetProfilePictureResponse {
    #[serde(default)]
    pub set_profile_picture: bool,
    #[serde(default)]
    pub url_avatar: String,
    #[serde(default)]
    pub reason: String,
}

// ═══════════════════════════════════════════════════════════════════════
//  Sending
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSendMessageParams {
    pub chat_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_chat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<bool>,
}

impl WaSendMessageParams {
    pub fn new(chat_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message: message.into(),
            quoted_message_id: None,
            archive_chat: None,
            link_preview: None,
        }
    }

    pub fn quoting(mut self, id_message: impl Into<String>) -> Self {
        self.quoted_message_id = Some(id_message.into());
        self
    }
}

/// Contact card sent with `sendContact`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaContactCard {
    pub phone_contact: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSendContactParams {
    pub chat_id: String,
    pub contact: WaContactCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_message_id: Option<String>,
}

/// File sent as multipart form data with `sendFileByUpload`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaFileUpload {
    pub chat_id: String,
    pub file: Vec<u8>,
    pub file_name: String,
    pub caption: Option<String>,
    pub quoted_message_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSendFileByUrlParams {
    pub chat_id: String,
    pub url_file: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_chat: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSendLocationParams {
    pub chat_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_message_id: Option<String>,
}

/// Response to every send operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSendMessageResponse {
    pub id_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaUploadFileResponse {
    pub url_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaGetChatHistoryParams {
    pub chat_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaReadChatParams {
    pub chat_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSetReadResponse {
    #[serde(default)]
    pub set_read: bool,
}

// ═══════════════════════════════════════════════════════════════════════
//  Receiving
// ═══════════════════════════════════════════════════════════════════════

/// One queued notification from `receiveNotification`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaReceivedNotification {
    pub receipt_id: u64,
    /// Same shape as a webhook POST body.
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaDeleteNotificationResponse {
    #[serde(default)]
    pub result: bool,
}

// ═══════════════════════════════════════════════════════════════════════
//  Contacts
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaCheckWhatsappResponse {
    #[serde(default)]
    pub exists_whatsapp: bool,
}

// ═══════════════════════════════════════════════════════════════════════
//  Groups
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaCreateGroupResponse {
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub group_invite_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaUpdateGroupNameResponse {
    #[serde(default)]
    pub update_group_name: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaLeaveGroupResponse {
    #[serde(default)]
    pub leave_group: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSetGroupAdminResponse {
    #[serde(default)]
    pub set_group_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaRemoveAdminResponse {
    #[serde(default)]
    pub remove_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaAddParticipantResponse {
    #[serde(default)]
    pub add_participant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaRemoveParticipantResponse {
    #[serde(default)]
    pub remove_participant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSetGroupPictureResponse {
    #[serde(default)]
    pub set_group_picture: bool,
    #[serde(default)]
    pub url_avatar: String,
    #[serde(default)]
    pub reason: String,
}

// ═══════════════════════════════════════════════════════════════════════
//  Queue
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaClearQueueResponse {
    #[serde(default)]
    pub is_cleared: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_values() {
        let json = r#"{"idInstance":"1101","apiTokenInstance":"tok"}"#;
        let config: WaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_host, DEFAULT_API_HOST);
        assert_eq!(config.auth_mode, WaAuthMode::Bearer);
        assert_eq!(config.timeout_sec, 30);
        assert_eq!(config.connect_timeout_sec, 15);
        assert!(!config.accept_invalid_certs);
        assert!(config.user_credentials().is_none());
    }

    #[test]
    fn test_validate_rejects_blank_credentials() {
        assert!(WaConfig::new("  ", "tok").validate().is_err());
        assert!(WaConfig::new("1101", "").validate().is_err());
        assert!(WaConfig::new("1101", "tok").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_host() {
        let cfg = WaConfig::new("1101", "tok").with_api_host("not a url");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_base_url_trims_slash() {
        let cfg = WaConfig::new("1101", "tok").with_api_host("https://gw.example.com/");
        assert_eq!(cfg.base_url(), "https://gw.example.com");
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("API_HOST", "https://gw.example.com"),
            ("ID_INSTANCE", "1101"),
            ("API_TOKEN_INSTANCE", "tok"),
            ("USER_ID", "u1"),
            ("USER_TOKEN", ""),
        ]
        .into_iter()
        .collect();
        let cfg = WaConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.api_host, "https://gw.example.com");
        assert_eq!(cfg.user_id.as_deref(), Some("u1"));
        assert!(cfg.user_token.is_none());
        assert!(cfg.user_credentials().is_none());
    }

    #[test]
    fn test_user_level_config_skips_instance_checks() {
        let cfg = WaConfig::for_user("u1", "secret");
        assert!(cfg.validate().is_err());
        assert!(cfg.validate_user_level().is_ok());
        assert!(WaConfig::for_user("u1", "  ").validate_user_level().is_err());
        assert!(WaConfig::new("1101", "tok").validate_user_level().is_err());

        let vars: HashMap<&str, &str> = [("USER_ID", "u1"), ("USER_TOKEN", "secret")]
            .into_iter()
            .collect();
        let cfg = WaConfig::user_from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.user_credentials(), Some(("u1", "secret")));
        assert_eq!(cfg.api_host, DEFAULT_API_HOST);

        let err = WaConfig::user_from_lookup(|_| None).unwrap_err();
        assert!(err.message.contains("USER_ID"));
    }

    #[test]
    fn test_from_lookup_missing_instance() {
        let err = WaConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.message.contains("ID_INSTANCE"));
    }

    #[test]
    fn test_send_message_params_skip_none() {
        let params = WaSendMessageParams::new("79999999999@c.us", "hello world");
        let v = serde_json::to_value(&params).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"chatId": "79999999999@c.us", "message": "hello world"})
        );
    }

    #[test]
    fn test_settings_keep_unknown_keys() {
        let raw = serde_json::json!({
            "webhookUrl": "https://hooks.example.com/wa",
            "stateWebhook": "yes",
            "pollMessageWebhook": "no"
        });
        let settings: WaSettings = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(settings.state_webhook.as_deref(), Some("yes"));
        assert_eq!(settings.extra["pollMessageWebhook"], "no");
        assert_eq!(serde_json::to_value(&settings).unwrap(), raw);
    }

    #[test]
    fn test_instance_state_unknown_variant() {
        let r: WaStateInstanceResponse =
            serde_json::from_str(r#"{"stateInstance":"somethingNew"}"#).unwrap();
        assert_eq!(r.state_instance, WaInstanceState::Unknown);
        let r: WaStateInstanceResponse =
            serde_json::from_str(r#"{"stateInstance":"authorized"}"#).unwrap();
        assert_eq!(r.state_instance, WaInstanceState::Authorized);
    }

    #[test]
    fn test_qr_response_type_field() {
        let r: WaQrResponse =
            serde_json::from_str(r#"{"type":"alreadyLogged","message":"instance is authorized"}"#)
                .unwrap();
        assert_eq!(r.qr_type, "alreadyLogged");
        assert!(r.png_bytes().is_err());
    }

    #[test]
    fn test_qr_png_bytes() {
        let r = WaQrResponse {
            qr_type: "qrCode".into(),
            message: "iVBORw0KGgo=".into(),
        };
        assert_eq!(&r.png_bytes().unwrap()[1..4], b"PNG");
    }
}
