//! # sdkwa-whatsapp: SDKWA WhatsApp Gateway Client
//!
//! Typed client for the SDKWA WhatsApp gateway REST API.
//!
//! ## Capabilities
//!
//! - **Account** – settings (including the webhook URL), instance state,
//!   reboot/logout, QR and phone-code authorization, profile name, status
//!   and picture.
//! - **Messaging** – text, contact, location, file by URL or upload, chat
//!   history, read marks, archive/unarchive, message deletion.
//! - **Receiving** – notification polling with explicit delete-after-processing.
//! - **Contacts** – contacts, chats, contact info, avatars, WhatsApp
//!   availability checks.
//! - **Groups** – create, rename, inspect, leave, participants, admins, picture.
//! - **Queue** – show and clear the outgoing message queue.
//! - **Instances** – user-level instance listing, ordering, extension,
//!   deletion and restore.
//! - **Webhooks** – classify inbound notifications into a closed set of
//!   event types and dispatch them to registered handlers, with an axum
//!   endpoint for serving them.

pub mod types;
pub mod error;
pub mod api_client;
pub mod account;
pub mod messaging;
pub mod receiving;
pub mod contacts;
pub mod groups;
pub mod queue;
pub mod instances;
pub mod notifications;
pub mod webhooks;
pub mod webhook_server;
pub mod service;

// Re-exports
pub use error::{SdkwaError, SdkwaErrorCode, SdkwaResult};
pub use instances::WaInstances;
pub use notifications::*;
pub use service::{SdkwaService, SdkwaServiceState};
pub use types::*;
pub use webhook_server::webhook_router;
pub use webhooks::{
    derive_tag, DispatchOutcome, EventType, HandlerResult, WaWebhooks, WebhookNotification,
};
