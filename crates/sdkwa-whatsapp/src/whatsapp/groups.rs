//! Group management.
//!
//! Creation, renaming, membership and admin rights, group picture.

use crate::whatsapp::account::file_part;
use crate::whatsapp::api_client::{decode, GatewayClient};
use crate::whatsapp::error::{SdkwaError, SdkwaResult};
use crate::whatsapp::types::*;
use log::info;
use reqwest::multipart;
use serde_json::json;

pub struct WaGroups {
    client: GatewayClient,
}

impl WaGroups {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Create a group with the given members.
    pub async fn create_group(
        &self,
        group_name: &str,
        chat_ids: &[String],
    ) -> SdkwaResult<WaCreateGroupResponse> {
        if group_name.trim().is_empty() {
            return Err(SdkwaError::internal("groupName must not be empty"));
        }
        let body = json!({ "groupName": group_name, "chatIds": chat_ids });
        let resp: WaCreateGroupResponse =
            decode(self.client.post_json("createGroup", &body).await?)?;
        info!("Created group '{}' ({})", group_name, resp.chat_id);
        Ok(resp)
    }

    pub async fn update_group_name(
        &self,
        group_id: &str,
        group_name: &str,
    ) -> SdkwaResult<WaUpdateGroupNameResponse> {
        let body = json!({ "groupId": group_id, "groupName": group_name });
        decode(self.client.post_json("updateGroupName", &body).await?)
    }

    pub async fn get_group_data(&self, group_id: &str) -> SdkwaResult<serde_json::Value> {
        let body = json!({ "groupId": group_id });
        self.client.post_json("getGroupData", &body).await
    }

    pub async fn leave_group(&self, group_id: &str) -> SdkwaResult<WaLeaveGroupResponse> {
        let body = json!({ "groupId": group_id });
        let resp = decode(self.client.post_json("leaveGroup", &body).await?)?;
        info!("Left group {}", group_id);
        Ok(resp)
    }

    // ─── Members ─────────────────────────────────────────────────────

    pub async fn set_group_admin(
        &self,
        group_id: &str,
        participant_chat_id: &str,
    ) -> SdkwaResult<WaSetGroupAdminResponse> {
        let body = participant_body(group_id, participant_chat_id);
        decode(self.client.post_json("setGroupAdmin", &body).await?)
    }

    pub async fn remove_admin(
        &self,
        group_id: &str,
        participant_chat_id: &str,
    ) -> SdkwaResult<WaRemoveAdminResponse> {
        let body = participant_body(group_id, participant_chat_id);
        decode(self.client.post_json("removeAdmin", &body).await?)
    }

    pub async fn add_group_participant(
        &self,
        group_id: &str,
        participant_chat_id: &str,
    ) -> SdkwaResult<WaAddParticipantResponse> {
        let body = participant_body(group_id, participant_chat_id);
        decode(self.client.post_json("addGroupParticipant", &body).await?)
    }

    pub async fn remove_group_participant(
        &self,
        group_id: &str,
        participant_chat_id: &str,
    ) -> SdkwaResult<WaRemoveParticipantResponse> {
        let body = participant_body(group_id, participant_chat_id);
        decode(self.client.post_json("removeGroupParticipant", &body).await?)
    }

    // ─── Picture ─────────────────────────────────────────────────────

    pub async fn set_group_picture(
        &self,
        group_id: &str,
        file: Vec<u8>,
    ) -> SdkwaResult<WaSetGroupPictureResponse> {
        let form = multipart::Form::new()
            .text("groupId", group_id.to_string())
            .part("file", file_part(file, None)?);
        decode(self.client.post_multipart("setGroupPicture", form).await?)
    }
}

fn participant_body(group_id: &str, participant_chat_id: &str) -> serde_json::Value {
    json!({ "groupId": group_id, "participantChatId": participant_chat_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatsapp::api_client::tests::setup;
    use wiremock::matchers::{body_json, body_string_contains, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_create_group() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/whatsapp/1101000001/createGroup"))
            .and(body_json(serde_json::json!({
                "groupName": "Team",
                "chatIds": ["79999999999@c.us", "79888888888@c.us"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "created": true,
                "chatId": "120363043968066561@g.us",
                "groupInviteLink": "https://chat.whatsapp.com/abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let members = vec!["79999999999@c.us".to_string(), "79888888888@c.us".to_string()];
        let resp = WaGroups::new(client)
            .create_group("Team", &members)
            .await
            .unwrap();
        assert!(resp.created);
        assert_eq!(resp.chat_id, "120363043968066561@g.us");
    }

    #[tokio::test]
    async fn test_create_group_rejects_blank_name() {
        let (_server, client) = setup().await;
        assert!(WaGroups::new(client).create_group(" ", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_set_group_admin_body() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/whatsapp/1101000001/setGroupAdmin"))
            .and(body_json(serde_json::json!({
                "groupId": "1203@g.us",
                "participantChatId": "79999999999@c.us"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"setGroupAdmin": true})),
            )
            .mount(&server)
            .await;

        let resp = WaGroups::new(client)
            .set_group_admin("1203@g.us", "79999999999@c.us")
            .await
            .unwrap();
        assert!(resp.set_group_admin);
    }

    #[tokio::test]
    async fn test_remove_group_participant() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/whatsapp/1101000001/removeGroupParticipant"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"removeParticipant": true})),
            )
            .mount(&server)
            .await;

        let resp = WaGroups::new(client)
            .remove_group_participant("1203@g.us", "79999999999@c.us")
            .await
            .unwrap();
        assert!(resp.remove_participant);
    }

    #[tokio::test]
    async fn test_set_group_picture_form() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/whatsapp/1101000001/setGroupPicture"))
            .and(body_string_contains("name=\"groupId\""))
            .and(body_string_contains("1203@g.us"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "setGroupPicture": true,
                "urlAvatar": "https://cdn.example.com/g.jpg"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = WaGroups::new(client)
            .set_group_picture("1203@g.us", b"picture".to_vec())
            .await
            .unwrap();
        assert!(resp.set_group_picture);
        assert_eq!(resp.reason, "");
    }
}
