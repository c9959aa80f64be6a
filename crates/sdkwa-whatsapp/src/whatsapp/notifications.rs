//! Typed shapes of inbound gateway notifications.
//!
//! The same body arrives as a webhook POST and as the `body` of a polled
//! notification. The gateway omits fields freely, so almost everything is
//! optional; unknown keys are ignored here and stay available in the raw
//! JSON handed to handlers alongside the typed view. Ids and timestamps
//! are accepted as numbers or numeric strings.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ═══════════════════════════════════════════════════════════════════════
//  Common blocks
// ═══════════════════════════════════════════════════════════════════════

/// Instance that produced the notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaInstanceData {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id_instance: Option<String>,
    /// WhatsApp id of the instance phone, e.g. `79999999999@c.us`.
    pub wid: Option<String>,
    pub type_instance: Option<String>,
}

/// Who sent an incoming message and in which chat.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaSenderData {
    pub chat_id: Option<String>,
    pub sender: Option<String>,
    pub sender_name: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
//  Message payloads
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaTextMessageData {
    pub text_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaFileMessageData {
    pub download_url: Option<String>,
    pub caption: Option<String>,
    pub file_name: Option<String>,
    /// Base64 JPEG preview.
    pub jpeg_thumbnail: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaLocationMessageData {
    pub name_location: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub jpeg_thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaContactMessageData {
    pub display_name: Option<String>,
    pub vcard: Option<String>,
}

/// Text with a link preview, or a quoted/forwarded text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaExtendedTextMessageData {
    pub text: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub preview_type: Option<String>,
    pub jpeg_thumbnail: Option<String>,
    pub forwarding_score: Option<u32>,
    pub is_forwarded: Option<bool>,
}

/// `messageData` block of an incoming message. Which sub-block is filled
/// depends on `type_message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaMessageData {
    pub type_message: Option<String>,
    pub text_message_data: Option<WaTextMessageData>,
    pub file_message_data: Option<WaFileMessageData>,
    pub location_message_data: Option<WaLocationMessageData>,
    pub contact_message_data: Option<WaContactMessageData>,
    pub extended_text_message_data: Option<WaExtendedTextMessageData>,
}

// ═══════════════════════════════════════════════════════════════════════
//  Notifications
// ═══════════════════════════════════════════════════════════════════════

/// `incomingMessageReceived`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaIncomingMessage {
    pub instance_data: Option<WaInstanceData>,
    /// Unix seconds.
    #[serde(default, deserialize_with = "unix_seconds")]
    pub timestamp: Option<i64>,
    pub id_message: Option<String>,
    pub sender_data: Option<WaSenderData>,
    #[serde(default)]
    pub message_data: WaMessageData,
}

impl WaIncomingMessage {
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(unix_time)
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.sender_data.as_ref()?.chat_id.as_deref()
    }

    /// Message text for plain and extended text messages, caption for files.
    pub fn text(&self) -> Option<&str> {
        let data = &self.message_data;
        if let Some(t) = data.text_message_data.as_ref().and_then(|d| d.text_message.as_deref()) {
            return Some(t);
        }
        if let Some(t) = data.extended_text_message_data.as_ref().and_then(|d| d.text.as_deref()) {
            return Some(t);
        }
        data.file_message_data.as_ref().and_then(|d| d.caption.as_deref())
    }
}

/// `outgoingMessageStatus`: delivery progress of a message sent by the instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaOutgoingMessageStatus {
    pub instance_data: Option<WaInstanceData>,
    #[serde(default, deserialize_with = "unix_seconds")]
    pub timestamp: Option<i64>,
    pub id_message: Option<String>,
    pub chat_id: Option<String>,
    /// `sent`, `delivered`, `read`, `failed`, `noAccount`, ...
    pub status: Option<String>,
    pub send_by_api: Option<bool>,
}

/// `stateInstanceChanged`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaStateInstanceChanged {
    pub instance_data: Option<WaInstanceData>,
    #[serde(default, deserialize_with = "unix_seconds")]
    pub timestamp: Option<i64>,
    /// Raw state string; see [`crate::whatsapp::types::WaInstanceState`].
    pub state_instance: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaDeviceData {
    pub platform: Option<String>,
    pub device_manufacturer: Option<String>,
    pub device_model: Option<String>,
    pub os_version: Option<String>,
    pub wa_version: Option<String>,
    /// Percent, as reported. Not clamped.
    pub battery: Option<u32>,
}

/// `deviceInfo`: phone details reported by the instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaDeviceInfo {
    pub instance_data: Option<WaInstanceData>,
    #[serde(default, deserialize_with = "unix_seconds")]
    pub timestamp: Option<i64>,
    pub device_data: Option<WaDeviceData>,
}

/// Decoded notification, one case per dispatchable event type.
#[derive(Debug, Clone, PartialEq)]
pub enum WaWebhookEvent {
    StateInstanceChanged(WaStateInstanceChanged),
    OutgoingMessageStatus(WaOutgoingMessageStatus),
    IncomingText(WaIncomingMessage),
    IncomingImage(WaIncomingMessage),
    IncomingLocation(WaIncomingMessage),
    IncomingContact(WaIncomingMessage),
    IncomingExtendedText(WaIncomingMessage),
    DeviceInfo(WaDeviceInfo),
}

impl WaWebhookEvent {
    /// The incoming message, for any of the `Incoming*` cases.
    pub fn incoming(&self) -> Option<&WaIncomingMessage> {
        match self {
            Self::IncomingText(m)
            | Self::IncomingImage(m)
            | Self::IncomingLocation(m)
            | Self::IncomingContact(m)
            | Self::IncomingExtendedText(m) => Some(m),
            _ => None,
        }
    }

    /// Event time reported by the gateway.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = match self {
            Self::StateInstanceChanged(n) => n.timestamp,
            Self::OutgoingMessageStatus(n) => n.timestamp,
            Self::DeviceInfo(n) => n.timestamp,
            _ => self.incoming().and_then(|m| m.timestamp),
        };
        secs.and_then(unix_time)
    }

    pub fn instance_data(&self) -> Option<&WaInstanceData> {
        match self {
            Self::StateInstanceChanged(n) => n.instance_data.as_ref(),
            Self::OutgoingMessageStatus(n) => n.instance_data.as_ref(),
            Self::DeviceInfo(n) => n.instance_data.as_ref(),
            _ => self.incoming().and_then(|m| m.instance_data.as_ref()),
        }
    }
}

fn unix_time(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

/// Whole seconds; fractions are truncated.
fn unix_seconds<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let seconds = |f: f64| -> Result<i64, D::Error> {
        (f.is_finite() && f.abs() < i64::MAX as f64)
            .then_some(f.trunc() as i64)
            .ok_or_else(|| de::Error::custom(format!("timestamp {} out of range", f)))
    };
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => seconds(n.as_f64().unwrap_or(f64::NAN)).map(Some),
        },
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => Ok(Some(i)),
            Err(_) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("invalid timestamp '{}'", s)))
                .and_then(seconds)
                .map(Some),
        },
        Some(other) => Err(de::Error::custom(format!("invalid timestamp {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incoming_text_shape() {
        let raw = serde_json::json!({
            "typeWebhook": "incomingMessageReceived",
            "instanceData": {
                "idInstance": 1101000001u64,
                "wid": "79999999999@c.us",
                "typeInstance": "whatsapp"
            },
            "timestamp": 1588091580,
            "idMessage": "F7AEC1B7086ECDC7E6E45923F5EDB825",
            "senderData": {
                "chatId": "79001234567@c.us",
                "sender": "79001234567@c.us",
                "senderName": "Ivan"
            },
            "messageData": {
                "typeMessage": "textMessage",
                "textMessageData": { "textMessage": "I use SDKWA" }
            }
        });
        let msg: WaIncomingMessage = serde_json::from_value(raw).unwrap();
        assert_eq!(msg.chat_id(), Some("79001234567@c.us"));
        assert_eq!(msg.text(), Some("I use SDKWA"));
        assert_eq!(
            msg.received_at().unwrap().to_rfc3339(),
            "2020-04-28T16:33:00+00:00"
        );
        assert_eq!(
            msg.instance_data.unwrap().id_instance.as_deref(),
            Some("1101000001")
        );
    }

    #[test]
    fn test_file_caption_is_text() {
        let raw = serde_json::json!({
            "messageData": {
                "typeMessage": "imageMessage",
                "fileMessageData": {
                    "downloadUrl": "https://cdn.example.com/f.jpg",
                    "caption": "look",
                    "mimeType": "image/jpeg"
                }
            }
        });
        let msg: WaIncomingMessage = serde_json::from_value(raw).unwrap();
        assert_eq!(msg.text(), Some("look"));
    }

    #[test]
    fn test_missing_message_data_defaults() {
        let msg: WaIncomingMessage = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(msg.message_data, WaMessageData::default());
        assert!(msg.text().is_none());
    }

    #[test]
    fn test_device_info_shape() {
        let raw = serde_json::json!({
            "typeWebhook": "deviceInfo",
            "timestamp": 1588091580,
            "deviceData": {
                "platform": "android",
                "deviceManufacturer": "Samsung",
                "deviceModel": "SM-A505FM",
                "osVersion": "11",
                "waVersion": "2.22.10.73",
                "battery": 55
            }
        });
        let info: WaDeviceInfo = serde_json::from_value(raw).unwrap();
        assert_eq!(info.device_data.unwrap().battery, Some(55));
    }

    #[test]
    fn test_event_accessors() {
        let event = WaWebhookEvent::IncomingLocation(WaIncomingMessage::default());
        assert!(event.incoming().is_some());
        let event = WaWebhookEvent::DeviceInfo(WaDeviceInfo {
            instance_data: Some(WaInstanceData {
                id_instance: Some("7".into()),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(event.incoming().is_none());
        assert_eq!(
            event.instance_data().unwrap().id_instance.as_deref(),
            Some("7")
        );
    }

    #[test]
    fn test_loose_ids_and_timestamps() {
        let raw = serde_json::json!({
            "instanceData": { "idInstance": "1101000001" },
            "timestamp": "1588091580",
            "stateInstance": "authorized"
        });
        let state: WaStateInstanceChanged = serde_json::from_value(raw).unwrap();
        assert_eq!(state.instance_data.unwrap().id_instance.as_deref(), Some("1101000001"));
        assert_eq!(state.timestamp, Some(1588091580));

        let raw = serde_json::json!({ "timestamp": 1588091580.9, "deviceData": { "battery": 300 } });
        let info: WaDeviceInfo = serde_json::from_value(raw).unwrap();
        assert_eq!(info.timestamp, Some(1588091580));
        assert_eq!(info.device_data.unwrap().battery, Some(300));

        let raw = serde_json::json!({ "timestamp": null, "instanceData": { "idInstance": null } });
        let state: WaStateInstanceChanged = serde_json::from_value(raw).unwrap();
        assert_eq!(state.timestamp, None);
        assert_eq!(state.instance_data.unwrap().id_instance, None);
    }

    #[test]
    fn test_unusable_timestamp_rejected() {
        for ts in [serde_json::json!("yesterday"), serde_json::json!(true)] {
            let raw = serde_json::json!({ "timestamp": ts });
            assert!(serde_json::from_value::<WaDeviceInfo>(raw).is_err());
        }
    }
}
