//! Serve `POST /webhook` on port 3000 and react to incoming notifications.
//!
//! Point the instance at the server first, e.g. through
//! `WaAccount::set_webhook_url("http://your-host:3000/webhook")`.

use log::info;
use sdkwa_whatsapp::{SdkwaService, WaConfig, WaWebhookEvent};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let service = SdkwaService::new(WaConfig::from_env()?)?;
    let webhooks = service.webhooks();

    webhooks.on_incoming_message_text(|n| {
        if let Some(msg) = n.event.as_ref().and_then(WaWebhookEvent::incoming) {
            info!(
                "Text from {}: {}",
                msg.chat_id().unwrap_or("?"),
                msg.text().unwrap_or_default()
            );
        }
        Ok(())
    });
    webhooks.on_state_instance(|n| {
        if let Some(WaWebhookEvent::StateInstanceChanged(state)) = &n.event {
            info!("Instance state: {:?}", state.state_instance);
        }
        Ok(())
    });
    webhooks.on_outgoing_message_status(|n| {
        info!("Outgoing status: {}", n.raw["status"]);
        Ok(())
    });

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, service.webhook_router("/webhook")).await?;
    Ok(())
}
