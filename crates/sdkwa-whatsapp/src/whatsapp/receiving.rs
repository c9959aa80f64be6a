//! Pull-based notification delivery.
//!
//! When no webhook URL is configured the gateway queues notifications.
//! They are fetched one at a time and must be deleted by receipt id once
//! processed, otherwise the same notification is returned again.

use crate::whatsapp::api_client::{decode, GatewayClient};
use crate::whatsapp::error::SdkwaResult;
use crate::whatsapp::types::*;
use log::{debug, warn};

pub struct WaReceiving {
    client: GatewayClient,
}

impl WaReceiving {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Fetch the oldest queued notification. `None` when the queue is empty.
    pub async fn receive_notification(&self) -> SdkwaResult<Option<WaReceivedNotification>> {
        let value = self.client.get("receiveNotification").await?;
        if value.is_null() || value.as_object().is_some_and(|o| o.is_empty()) {
            return Ok(None);
        }
        decode(value).map(Some)
    }

    pub async fn delete_notification(
        &self,
        receipt_id: u64,
    ) -> SdkwaResult<WaDeleteNotificationResponse> {
        let id = receipt_id.to_string();
        decode(self.client.delete("deleteNotification", &id).await?)
    }

    /// Receive one notification and pass its body to `handler`.
    ///
    /// The notification is deleted only when the handler succeeds; on a
    /// handler error it stays queued and the error is returned. Returns
    /// `true` when a notification was consumed.
    pub async fn poll_once<F>(&self, handler: F) -> SdkwaResult<bool>
    where
        F: FnOnce(&serde_json::Value) -> SdkwaResult<()>,
    {
        let Some(notification) = self.receive_notification().await? else {
            return Ok(false);
        };
        debug!("Received notification {}", notification.receipt_id);

        if let Err(e) = handler(&notification.body) {
            warn!(
                "Leaving notification {} queued: {}",
                notification.receipt_id, e
            );
            return Err(e);
        }

        let resp = self.delete_notification(notification.receipt_id).await?;
        if !resp.result {
            warn!(
                "Gateway did not confirm deletion of notification {}",
                notification.receipt_id
            );
        }
        Ok(true)
    }
}
