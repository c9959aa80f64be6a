//! Send a text message and a file by URL.
//!
//! ```text
//! ID_INSTANCE=... API_TOKEN_INSTANCE=... CHAT_ID=79999999999@c.us \
//!     cargo run --example send_message
//! ```

use log::info;
use sdkwa_whatsapp::{
    SdkwaResult, SdkwaService, WaConfig, WaSendFileByUrlParams, WaSendMessageParams,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> SdkwaResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let service = SdkwaService::new(WaConfig::from_env()?)?;
    let chat_id = std::env::var("CHAT_ID").unwrap_or_else(|_| "79999999999@c.us".into());

    let sent = service
        .messaging()
        .send_message(&WaSendMessageParams::new(&chat_id, "hello world"))
        .await?;
    info!("Sent text {}", sent.id_message);

    let file = WaSendFileByUrlParams {
        chat_id,
        url_file: "https://avatars.mds.yandex.net/get-pdb/477388/77f64197-87d2-42cf-9305-14f49c65f1da/s375".into(),
        file_name: "horse.png".into(),
        caption: Some("horse".into()),
        quoted_message_id: None,
        archive_chat: None,
    };
    let sent = service.messaging().send_file_by_url(&file).await?;
    info!("Sent file {}", sent.id_message);
    Ok(())
}
