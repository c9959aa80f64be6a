//! Contacts, chats and number lookups.

use crate::whatsapp::api_client::{decode, GatewayClient};
use crate::whatsapp::error::{SdkwaError, SdkwaResult};
use crate::whatsapp::types::*;
use serde_json::json;

pub struct WaContacts {
    client: GatewayClient,
}

impl WaContacts {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub async fn get_contacts(&self) -> SdkwaResult<Vec<serde_json::Value>> {
        decode(self.client.get("getContacts").await?)
    }

    pub async fn get_chats(&self) -> SdkwaResult<Vec<serde_json::Value>> {
        decode(self.client.get("getChats").await?)
    }

    /// The gateway reads `chatId` from a JSON body on this GET.
    pub async fn get_contact_info(&self, chat_id: &str) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "chatId": chat_id });
        self.client.get_with_body("getContactInfo", &body).await
    }

    pub async fn get_avatar(&self, chat_id: &str) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "chatId": chat_id });
        self.client.post_json("getAvatar", &body).await
    }

    /// Whether `phone_number` (international format, digits only) has a
    /// WhatsApp account.
    pub async fn check_whatsapp(&self, phone_number: u64) -> SdkwaResult<WaCheckWhatsappResponse> {
        let body = json!({ "phoneNumber": phone_number });
        decode(self.client.post_json("checkWhatsapp", &body).await?)
    }
}

// ─── Chat id helpers ─────────────────────────────────────────────────

/// Personal chat id: `{digits}@c.us`. Formatting characters such as `+`,
/// spaces and dashes are dropped.
pub fn personal_chat_id(phone: &str) -> SdkwaResult<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(SdkwaError::internal(format!(
            "'{}' does not contain a phone number",
            phone
        )));
    }
    Ok(format!("{}@c.us", digits))
}

/// Group chat id: `{group_id}@g.us`. Ids already carrying the suffix are
/// returned as is.
pub fn group_chat_id(group_id: &str) -> String {
    if group_id.ends_with("@g.us") {
        group_id.to_string()
    } else {
        format!("{}@g.us", group_id)
    }
}

pub fn is_group_chat(chat_id: &str) -> bool {
    chat_id.ends_with("@g.us")
}
