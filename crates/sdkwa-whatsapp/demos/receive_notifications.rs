//! Poll the notification queue and print incoming text messages.
//!
//! The instance must have no webhook URL set, otherwise the gateway does
//! not queue notifications.

use log::{error, info};
use sdkwa_whatsapp::{
    derive_tag, SdkwaResult, SdkwaService, WaConfig, WaIncomingMessage,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> SdkwaResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let service = SdkwaService::new(WaConfig::from_env()?)?;
    info!("Polling for notifications, Ctrl+C to stop");

    loop {
        let polled = service
            .receiving()
            .poll_once(|body| {
                let tag = derive_tag(body)?;
                if tag == "incomingMessageReceived_textMessage" {
                    let msg: WaIncomingMessage = serde_json::from_value(body.clone())?;
                    info!(
                        "{} says: {}",
                        msg.chat_id().unwrap_or("?"),
                        msg.text().unwrap_or_default()
                    );
                } else {
                    info!("Skipping {}", tag);
                }
                Ok(())
            })
            .await;

        match polled {
            Ok(true) => {}
            Ok(false) => tokio::time::sleep(Duration::from_secs(1)).await,
            Err(e) => {
                error!("Polling failed: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}
