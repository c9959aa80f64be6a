//! User-level instance management.
//!
//! These calls are authenticated with the account's `x-user-id` /
//! `x-user-token` pair rather than an instance token, and fail with
//! `NotConfigured` before any request when either is missing.

use crate::whatsapp::api_client::GatewayClient;
use crate::whatsapp::error::SdkwaResult;
use crate::whatsapp::types::WaConfig;
use log::info;
use serde_json::json;

pub struct WaInstances {
    client: GatewayClient,
}

impl WaInstances {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Standalone manager needing only the host and user credentials,
    /// e.g. from [`WaConfig::for_user`].
    pub fn from_config(config: &WaConfig) -> SdkwaResult<Self> {
        Ok(Self::new(GatewayClient::for_user(config)?))
    }

    pub async fn get_instances(&self) -> SdkwaResult<serde_json::Value> {
        self.client.post_user("instances/list", None).await
    }

    /// Order a new instance, e.g. tariff `DEVELOPER` for period `infinitely`.
    pub async fn create_instance(
        &self,
        tariff: &str,
        period: &str,
        payment_type: Option<&str>,
    ) -> SdkwaResult<serde_json::Value> {
        let body = order_body(None, tariff, period, payment_type);
        let resp = self
            .client
            .post_user("instance/createByOrder", Some(&body))
            .await?;
        info!("Ordered instance (tariff {}, period {})", tariff, period);
        Ok(resp)
    }

    pub async fn extend_instance(
        &self,
        id_instance: u64,
        tariff: &str,
        period: &str,
        payment_type: Option<&str>,
    ) -> SdkwaResult<serde_json::Value> {
        let body = order_body(Some(id_instance), tariff, period, payment_type);
        let resp = self
            .client
            .post_user("instance/extendByOrder", Some(&body))
            .await?;
        info!("Extended instance {} by {}", id_instance, period);
        Ok(resp)
    }

    pub async fn delete_instance(&self, id_instance: u64) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "idInstance": id_instance });
        let resp = self.client.post_user("instance/delete", Some(&body)).await?;
        info!("Deleted instance {}", id_instance);
        Ok(resp)
    }

    pub async fn restore_instance(&self, id_instance: u64) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "idInstance": id_instance });
        let resp = self.client.post_user("instance/restore", Some(&body)).await?;
        info!("Restored instance {}", id_instance);
        Ok(resp)
    }
}

fn order_body(
    id_instance: Option<u64>,
    tariff: &str,
    period: &str,
    payment_type: Option<&str>,
) -> serde_json::Value {
    let mut body = json!({ "tariff": tariff, "period": period });
    if let Some(id) = id_instance {
        body["idInstance"] = json!(id);
    }
    if let Some(pt) = payment_type.filter(|p| !p.is_empty()) {
        body["paymentType"] = json!(pt);
    }
    body
}
