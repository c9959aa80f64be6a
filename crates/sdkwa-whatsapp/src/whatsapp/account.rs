//! Instance account operations.
//!
//! Settings (webhook URL and per-kind webhook switches), authorization
//! state, QR / phone-code login, registration codes, reboot/logout and
//! profile name, status and picture.

use crate::whatsapp::api_client::{decode, GatewayClient};
use crate::whatsapp::error::{SdkwaError, SdkwaResult};
use crate::whatsapp::types::*;
use log::info;
use reqwest::multipart;
use serde_json::json;

/// Account-level operations for one instance.
pub struct WaAccount {
    client: GatewayClient,
}

impl WaAccount {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    // ─── Settings ────────────────────────────────────────────────────

    pub async fn get_settings(&self) -> SdkwaResult<WaSettings> {
        decode(self.client.get("getSettings").await?)
    }

    /// Update settings. Only fields that are set are sent.
    pub async fn set_settings(&self, settings: &WaSettings) -> SdkwaResult<WaSaveSettingsResponse> {
        let body = serde_json::to_value(settings)?;
        let resp = decode(self.client.post_json("setSettings", &body).await?)?;
        info!("Updated settings for instance {}", self.client.config().id_instance);
        Ok(resp)
    }

    /// Point notifications at `webhook_url`. Pass an empty string to
    /// switch webhooks off and fall back to polling.
    pub async fn set_webhook_url(&self, webhook_url: &str) -> SdkwaResult<WaSaveSettingsResponse> {
        let settings = WaSettings {
            webhook_url: Some(webhook_url.to_string()),
            ..Default::default()
        };
        self.set_settings(&settings).await
    }

    // ─── State ───────────────────────────────────────────────────────

    pub async fn get_state_instance(&self) -> SdkwaResult<WaStateInstanceResponse> {
        decode(self.client.get("getStateInstance").await?)
    }

    pub async fn get_warming_phone_status(&self) -> SdkwaResult<serde_json::Value> {
        self.client.get("getWarmingPhoneStatus").await
    }

    pub async fn reboot(&self) -> SdkwaResult<WaRebootResponse> {
        let resp = decode(self.client.get("reboot").await?)?;
        info!("Reboot requested for instance {}", self.client.config().id_instance);
        Ok(resp)
    }

    pub async fn logout(&self) -> SdkwaResult<WaLogoutResponse> {
        let resp = decode(self.client.get("logout").await?)?;
        info!("Logout requested for instance {}", self.client.config().id_instance);
        Ok(resp)
    }

    // ─── Authorization ───────────────────────────────────────────────

    pub async fn get_qr(&self) -> SdkwaResult<WaQrResponse> {
        decode(self.client.get("qr").await?)
    }

    /// Request a pairing code to link the instance by phone number instead
    /// of QR.
    pub async fn get_authorization_code(
        &self,
        phone_number: u64,
    ) -> SdkwaResult<WaAuthorizationCodeResponse> {
        let body = json!({ "phoneNumber": phone_number });
        decode(self.client.post_json("getAuthorizationCode", &body).await?)
    }

    pub async fn request_registration_code(
        &self,
        phone_number: u64,
        method: WaRegistrationMethod,
    ) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "phoneNumber": phone_number, "method": method });
        self.client.post_json("requestRegistrationCode", &body).await
    }

    pub async fn send_registration_code(&self, code: &str) -> SdkwaResult<serde_json::Value> {
        if code.trim().is_empty() {
            return Err(SdkwaError::internal("Registration code must not be empty"));
        }
        let body = json!({ "code": code });
        self.client.post_json("sendRegistrationCode", &body).await
    }

    // ─── Profile ─────────────────────────────────────────────────────

    pub async fn set_profile_picture(
        &self,
        file: Vec<u8>,
    ) -> SdkwaResult<WaSetProfilePictureResponse> {
        let form = multipart::Form::new().part("file", file_part(file, None)?);
        decode(self.client.post_multipart("setProfilePicture", form).await?)
    }

    pub async fn set_profile_name(&self, name: &str) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "name": name });
        self.client.post_json("setProfileName", &body).await
    }

    pub async fn set_profile_status(&self, status: &str) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "status": status });
        self.client.post_json("setProfileStatus", &body).await
    }
}

/// Build the `file` part of an upload form. Without a file name the gateway
/// sniffs the content type itself.
pub(crate) fn file_part(data: Vec<u8>, file_name: Option<&str>) -> SdkwaResult<multipart::Part> {
    let part = multipart::Part::bytes(data);
    let part = match file_name {
        Some(name) => {
            let mime = mime_for_file_name(name);
            part.file_name(name.to_string())
                .mime_str(mime)
                .map_err(|e| SdkwaError::internal(format!("Bad MIME type: {}", e)))?
        }
        None => part.file_name("file"),
    };
    Ok(part)
}

fn mime_for_file_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
