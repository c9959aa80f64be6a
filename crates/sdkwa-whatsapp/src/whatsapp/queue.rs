//! Outgoing message queue.

use crate::whatsapp::api_client::{decode, GatewayClient};
use crate::whatsapp::error::SdkwaResult;
use crate::whatsapp::types::WaClearQueueResponse;
use log::info;

pub struct WaQueue {
    client: GatewayClient,
}

impl WaQueue {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Drop every message still waiting to be sent.
    pub async fn clear_messages_queue(&self) -> SdkwaResult<WaClearQueueResponse> {
        let resp = decode(self.client.get("clearMessagesQueue").await?)?;
        info!(
            "Cleared outgoing queue of instance {}",
            self.client.config().id_instance
        );
        Ok(resp)
    }

    pub async fn show_messages_queue(&self) -> SdkwaResult<Vec<serde_json::Value>> {
        decode(self.client.get("showMessagesQueue").await?)
    }
}
