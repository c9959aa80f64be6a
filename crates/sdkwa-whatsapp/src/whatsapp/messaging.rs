//! Send and manage WhatsApp messages through the gateway.
//!
//! Covers text, contact cards, locations, files by URL or multipart
//! upload, plus chat history, read marks, archiving and deletion.

use crate::whatsapp::account::file_part;
use crate::whatsapp::api_client::{decode, GatewayClient};
use crate::whatsapp::error::{SdkwaError, SdkwaResult};
use crate::whatsapp::types::*;
use log::debug;
use reqwest::multipart;
use serde_json::json;

/// Message sender backed by the gateway HTTP client.
pub struct WaMessaging {
    client: GatewayClient,
}

impl WaMessaging {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    // ─── Sending ─────────────────────────────────────────────────────

    /// Send a plain text message.
    pub async fn send_message(
        &self,
        params: &WaSendMessageParams,
    ) -> SdkwaResult<WaSendMessageResponse> {
        if params.message.is_empty() {
            return Err(SdkwaError::internal("Message text must not be empty"));
        }
        debug!("Sending text to {}", params.chat_id);
        let body = serde_json::to_value(params)?;
        decode(self.client.post_json("sendMessage", &body).await?)
    }

    /// Send a contact card.
    pub async fn send_contact(
        &self,
        params: &WaSendContactParams,
    ) -> SdkwaResult<WaSendMessageResponse> {
        debug!("Sending contact to {}", params.chat_id);
        let body = serde_json::to_value(params)?;
        decode(self.client.post_json("sendContact", &body).await?)
    }

    /// Upload a file and send it in one multipart request.
    pub async fn send_file_by_upload(
        &self,
        upload: WaFileUpload,
    ) -> SdkwaResult<WaSendMessageResponse> {
        if upload.file_name.trim().is_empty() {
            return Err(SdkwaError::internal("fileName is required"));
        }
        debug!("Uploading {} to {}", upload.file_name, upload.chat_id);

        let mut form = multipart::Form::new()
            .text("chatId", upload.chat_id)
            .part("file", file_part(upload.file, Some(&upload.file_name))?);
        if let Some(caption) = upload.caption.filter(|c| !c.is_empty()) {
            form = form.text("caption", caption);
        }
        if let Some(quoted) = upload.quoted_message_id.filter(|q| !q.is_empty()) {
            form = form.text("quotedMessageId", quoted);
        }

        decode(self.client.post_multipart("sendFileByUpload", form).await?)
    }

    /// Send a file the gateway downloads from `url_file`.
    pub async fn send_file_by_url(
        &self,
        params: &WaSendFileByUrlParams,
    ) -> SdkwaResult<WaSendMessageResponse> {
        debug!("Sending {} by URL to {}", params.file_name, params.chat_id);
        let body = serde_json::to_value(params)?;
        decode(self.client.post_json("sendFileByUrl", &body).await?)
    }

    /// Send a location pin.
    pub async fn send_location(
        &self,
        params: &WaSendLocationParams,
    ) -> SdkwaResult<WaSendMessageResponse> {
        if !(-90.0..=90.0).contains(&params.latitude)
            || !(-180.0..=180.0).contains(&params.longitude)
        {
            return Err(SdkwaError::internal(format!(
                "Coordinates out of range: {}, {}",
                params.latitude, params.longitude
            )));
        }
        let body = serde_json::to_value(params)?;
        decode(self.client.post_json("sendLocation", &body).await?)
    }

    /// Upload a file to gateway storage and return its URL, for later use
    /// with [`WaMessaging::send_file_by_url`].
    pub async fn upload_file(&self, file: Vec<u8>) -> SdkwaResult<WaUploadFileResponse> {
        let form = multipart::Form::new().part("file", file_part(file, None)?);
        decode(self.client.post_multipart("uploadFile", form).await?)
    }

    // ─── Chat management ─────────────────────────────────────────────

    pub async fn get_chat_history(
        &self,
        params: &WaGetChatHistoryParams,
    ) -> SdkwaResult<Vec<serde_json::Value>> {
        let body = serde_json::to_value(params)?;
        decode(self.client.post_json("getChatHistory", &body).await?)
    }

    /// Mark a chat, or one message in it, as read.
    pub async fn read_chat(&self, params: &WaReadChatParams) -> SdkwaResult<WaSetReadResponse> {
        let body = serde_json::to_value(params)?;
        decode(self.client.post_json("readChat", &body).await?)
    }

    pub async fn archive_chat(&self, chat_id: &str) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "chatId": chat_id });
        self.client.post_json("archiveChat", &body).await
    }

    pub async fn unarchive_chat(&self, chat_id: &str) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "chatId": chat_id });
        self.client.post_json("unarchiveChat", &body).await
    }

    pub async fn delete_message(
        &self,
        chat_id: &str,
        id_message: &str,
    ) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "chatId": chat_id, "idMessage": id_message });
        self.client.post_json("deleteMessage", &body).await
    }
}
