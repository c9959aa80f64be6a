//! Inbound webhook classification and dispatch.
//!
//! Every gateway notification carries a `typeWebhook`; incoming messages
//! also carry `messageData.typeMessage`. The two combine into a tag
//! (`incomingMessageReceived_textMessage`, `deviceInfo`, ...) which selects
//! at most one registered handler:
//!
//! 1. read `typeWebhook` (must be a string);
//! 2. if `messageData.typeMessage` is present and not `null`, `false`,
//!    `0` or `""` the tag is `{typeWebhook}_{typeMessage}`, otherwise just
//!    `typeWebhook`;
//! 3. look the tag up; tags outside [`EventType`] or without a handler are
//!    a no-op;
//! 4. invoke the handler with the untouched JSON and, when the body fits
//!    the event's typed shape, a decoded [`WaWebhookEvent`].
//!
//! Registering a second handler for the same event type replaces the
//! first. The table sits behind a read-write lock, so handlers can be
//! registered while requests are being served.

use crate::whatsapp::error::{SdkwaError, SdkwaResult};
use crate::whatsapp::notifications::*;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Result returned by webhook handlers. Any error type converts through `?`.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type Handler = Arc<dyn Fn(&WebhookNotification) -> HandlerResult + Send + Sync>;

// ─── Event types ─────────────────────────────────────────────────────

/// Closed set of dispatchable notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    StateInstanceChanged,
    OutgoingMessageStatus,
    IncomingMessageText,
    /// Registered through [`WaWebhooks::on_incoming_message_file`].
    IncomingMessageImage,
    IncomingMessageLocation,
    IncomingMessageContact,
    IncomingMessageExtendedText,
    DeviceInfo,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::StateInstanceChanged,
        EventType::OutgoingMessageStatus,
        EventType::IncomingMessageText,
        EventType::IncomingMessageImage,
        EventType::IncomingMessageLocation,
        EventType::IncomingMessageContact,
        EventType::IncomingMessageExtendedText,
        EventType::DeviceInfo,
    ];

    /// Wire tag this event type is dispatched under.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StateInstanceChanged => "stateInstanceChanged",
            Self::OutgoingMessageStatus => "outgoingMessageStatus",
            Self::IncomingMessageText => "incomingMessageReceived_textMessage",
            Self::IncomingMessageImage => "incomingMessageReceived_imageMessage",
            Self::IncomingMessageLocation => "incomingMessageReceived_locationMessage",
            Self::IncomingMessageContact => "incomingMessageReceived_contactMessage",
            Self::IncomingMessageExtendedText => "incomingMessageReceived_extendedTextMessage",
            Self::DeviceInfo => "deviceInfo",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Decode `raw` into the typed case for this event type.
    pub fn decode(self, raw: &Value) -> SdkwaResult<WaWebhookEvent> {
        Ok(match self {
            Self::StateInstanceChanged => WaWebhookEvent::StateInstanceChanged(parse(self, raw)?),
            Self::OutgoingMessageStatus => WaWebhookEvent::OutgoingMessageStatus(parse(self, raw)?),
            Self::IncomingMessageText => WaWebhookEvent::IncomingText(parse(self, raw)?),
            Self::IncomingMessageImage => WaWebhookEvent::IncomingImage(parse(self, raw)?),
            Self::IncomingMessageLocation => WaWebhookEvent::IncomingLocation(parse(self, raw)?),
            Self::IncomingMessageContact => WaWebhookEvent::IncomingContact(parse(self, raw)?),
            Self::IncomingMessageExtendedText => {
                WaWebhookEvent::IncomingExtendedText(parse(self, raw)?)
            }
            Self::DeviceInfo => WaWebhookEvent::DeviceInfo(parse(self, raw)?),
        })
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse<T: DeserializeOwned>(event_type: EventType, raw: &Value) -> SdkwaResult<T> {
    T::deserialize(raw).map_err(|e| {
        SdkwaError::malformed_payload(format!("Invalid '{}' payload: {}", event_type, e))
    })
}

/// Derive the dispatch tag of a notification body.
pub fn derive_tag(payload: &Value) -> SdkwaResult<String> {
    let type_webhook = payload
        .get("typeWebhook")
        .and_then(Value::as_str)
        .ok_or_else(|| SdkwaError::malformed_payload("typeWebhook is missing or not a string"))?;

    let type_message = payload
        .get("messageData")
        .and_then(|m| m.get("typeMessage"))
        .filter(|t| is_truthy(t));

    Ok(match type_message {
        Some(tm) => format!("{}_{}", type_webhook, tag_part(tm)),
        None => type_webhook.to_string(),
    })
}

/// `null`, `false`, `0` and `""` count as absent.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a non-string `typeMessage` the way it is concatenated on the
/// wire side: `7`, `true`, `a,b`, `[object Object]`.
fn tag_part(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(tag_part).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

// ─── Dispatcher ──────────────────────────────────────────────────────

/// What a handler receives.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookNotification {
    pub event_type: EventType,
    /// Typed view of `raw`. `None` when a field does not fit its typed
    /// shape; the handler still runs and `raw` is authoritative.
    pub event: Option<WaWebhookEvent>,
    /// The body exactly as received.
    pub raw: Value,
}

/// Result of a successful [`WaWebhooks::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled(EventType),
    /// No handler for this tag. Not an error.
    Unhandled(String),
}

/// Handler registration table plus dispatch entry point.
pub struct WaWebhooks {
    handlers: RwLock<[Option<Handler>; 8]>,
}

impl Default for WaWebhooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WaWebhooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaWebhooks")
            .field("registered", &self.registered())
            .finish()
    }
}

impl WaWebhooks {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Default::default()),
        }
    }

    // ─── Registration ────────────────────────────────────────────────

    /// Register `handler` for `event_type`, replacing any previous one.
    pub fn on<F>(&self, event_type: EventType, handler: F)
    where
        F: Fn(&WebhookNotification) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.write()[event_type.index()] = Some(Arc::new(handler));
    }

    pub fn on_state_instance<F>(&self, handler: F)
    where
        F: Fn(&WebhookNotification) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(EventType::StateInstanceChanged, handler)
    }

    pub fn on_outgoing_message_status<F>(&self, handler: F)
    where
        F: Fn(&WebhookNotification) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(EventType::OutgoingMessageStatus, handler)
    }

    pub fn on_incoming_message_text<F>(&self, handler: F)
    where
        F: Fn(&WebhookNotification) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(EventType::IncomingMessageText, handler)
    }

    /// Incoming image messages (`imageMessage`).
    pub fn on_incoming_message_file<F>(&self, handler: F)
    where
        F: Fn(&WebhookNotification) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(EventType::IncomingMessageImage, handler)
    }

    pub fn on_incoming_message_location<F>(&self, handler: F)
    where
        F: Fn(&WebhookNotification) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(EventType::IncomingMessageLocation, handler)
    }

    pub fn on_incoming_message_contact<F>(&self, handler: F)
    where
        F: Fn(&WebhookNotification) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(EventType::IncomingMessageContact, handler)
    }

    pub fn on_incoming_message_extended_text<F>(&self, handler: F)
    where
        F: Fn(&WebhookNotification) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(EventType::IncomingMessageExtendedText, handler)
    }

    pub fn on_device_info<F>(&self, handler: F)
    where
        F: Fn(&WebhookNotification) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(EventType::DeviceInfo, handler)
    }

    pub fn is_registered(&self, event_type: EventType) -> bool {
        self.handlers.read()[event_type.index()].is_some()
    }

    /// Event types that currently have a handler.
    pub fn registered(&self) -> Vec<EventType> {
        let table = self.handlers.read();
        EventType::ALL
            .into_iter()
            .filter(|t| table[t.index()].is_some())
            .collect()
    }

    // ─── Dispatch ────────────────────────────────────────────────────

    /// Classify `payload` and run the matching handler, if any.
    ///
    /// Fails with `MalformedPayload` when `typeWebhook` is missing or not a
    /// string, and with `HandlerFailed` when the handler returns an error.
    pub fn dispatch(&self, payload: Value) -> SdkwaResult<DispatchOutcome> {
        let tag = derive_tag(&payload)?;
        let Some(event_type) = EventType::from_tag(&tag) else {
            return Ok(DispatchOutcome::Unhandled(tag));
        };

        // Lock is released before the handler runs.
        let handler = self.handlers.read()[event_type.index()].clone();
        let Some(handler) = handler else {
            return Ok(DispatchOutcome::Unhandled(tag));
        };

        let notification = WebhookNotification {
            event_type,
            event: event_type.decode(&payload).ok(),
            raw: payload,
        };
        handler(&notification).map_err(|e| SdkwaError::handler_failed(event_type.as_str(), e))?;
        Ok(DispatchOutcome::Handled(event_type))
    }
}
