//! List the account's instances and order a new one.
//!
//! Needs only `USER_ID` and `USER_TOKEN` (and optionally `API_HOST`).

use log::info;
use sdkwa_whatsapp::{SdkwaResult, WaConfig, WaInstances};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> SdkwaResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let instances = WaInstances::from_config(&WaConfig::user_from_env()?)?;

    let list = instances.get_instances().await?;
    info!("Instances: {}", list);

    let created = instances
        .create_instance("DEVELOPER", "infinitely", None)
        .await?;
    info!("Created: {}", created);
    Ok(())
}
