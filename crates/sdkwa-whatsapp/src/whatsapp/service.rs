//! High-level service facade.
//!
//! `SdkwaService` owns the gateway client, one manager per API area and
//! the webhook dispatcher for a single instance.

use crate::whatsapp::account::WaAccount;
use crate::whatsapp::api_client::GatewayClient;
use crate::whatsapp::contacts::WaContacts;
use crate::whatsapp::error::SdkwaResult;
use crate::whatsapp::groups::WaGroups;
use crate::whatsapp::instances::WaInstances;
use crate::whatsapp::messaging::WaMessaging;
use crate::whatsapp::queue::WaQueue;
use crate::whatsapp::receiving::WaReceiving;
use crate::whatsapp::types::WaConfig;
use crate::whatsapp::webhook_server::webhook_router;
use crate::whatsapp::webhooks::WaWebhooks;
use log::info;
use std::sync::Arc;

/// Shared state type for servers holding one service.
pub type SdkwaServiceState = Arc<SdkwaService>;

pub struct SdkwaService {
    client: GatewayClient,
    account: WaAccount,
    messaging: WaMessaging,
    receiving: WaReceiving,
    contacts: WaContacts,
    groups: WaGroups,
    queue: WaQueue,
    instances: WaInstances,
    webhooks: Arc<WaWebhooks>,
}

impl SdkwaService {
    /// Validate `config` and build every manager on one shared client.
    pub fn new(config: WaConfig) -> SdkwaResult<Self> {
        let client = GatewayClient::new(&config)?;

        let service = Self {
            account: WaAccount::new(client.clone()),
            messaging: WaMessaging::new(client.clone()),
            receiving: WaReceiving::new(client.clone()),
            contacts: WaContacts::new(client.clone()),
            groups: WaGroups::new(client.clone()),
            queue: WaQueue::new(client.clone()),
            instances: WaInstances::new(client.clone()),
            webhooks: Arc::new(WaWebhooks::new()),
            client,
        };

        info!(
            "SDKWA client configured for instance {} at {}",
            config.id_instance,
            config.base_url()
        );
        Ok(service)
    }

    pub fn config(&self) -> &WaConfig {
        self.client.config()
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }

    pub fn account(&self) -> &WaAccount {
        &self.account
    }

    pub fn messaging(&self) -> &WaMessaging {
        &self.messaging
    }

    pub fn receiving(&self) -> &WaReceiving {
        &self.receiving
    }

    pub fn contacts(&self) -> &WaContacts {
        &self.contacts
    }

    pub fn groups(&self) -> &WaGroups {
        &self.groups
    }

    pub fn queue(&self) -> &WaQueue {
        &self.queue
    }

    pub fn instances(&self) -> &WaInstances {
        &self.instances
    }

    /// Dispatcher for inbound notifications. Clone the `Arc` to share it
    /// with an HTTP server.
    pub fn webhooks(&self) -> &Arc<WaWebhooks> {
        &self.webhooks
    }

    /// axum router serving this service's dispatcher at `POST {path}`.
    pub fn webhook_router(&self, path: &str) -> axum::Router {
        webhook_router(self.webhooks.clone(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatsapp::api_client::tests::test_config;
    use crate::whatsapp::error::SdkwaErrorCode;
    use crate::whatsapp::webhooks::EventType;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_new_rejects_blank_instance() {
        let err = SdkwaService::new(WaConfig::new("1101", " ")).err().unwrap();
        assert_eq!(err.code, SdkwaErrorCode::InvalidConfig);
    }

    #[test]
    fn test_webhooks_shared_with_router() {
        let service = SdkwaService::new(test_config("https://api.sdkwa.pro")).unwrap();
        let shared = service.webhooks().clone();
        shared.on_device_info(|_| Ok(()));
        assert!(service.webhooks().is_registered(EventType::DeviceInfo));
        assert!(Arc::ptr_eq(&shared, service.webhooks()));
    }

    #[tokio::test]
    async fn test_managers_share_instance_config() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/whatsapp/1101000001/getStateInstance"))
            .and(bearer_token("test_token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"stateInstance": "authorized"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/whatsapp/1101000001/showMessagesQueue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let service = SdkwaService::new(test_config(&server.uri())).unwrap();
        assert_eq!(service.config().id_instance, "1101000001");
        service.account().get_state_instance().await.unwrap();
        assert!(service.queue().show_messages_queue().await.unwrap().is_empty());
    }
}
