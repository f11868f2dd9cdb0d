//! Telegram Bot API client: `sendMessage` for delivery, `getUpdates` for
//! long-polling subscription commands.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::messaging::{DeliveryError, Messenger};

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

/// Every Bot API reply is wrapped in this envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    /// `api_url` is the Bot API root (e.g. `https://api.telegram.org`).
    /// `timeout` must exceed any long-poll timeout passed to `get_updates`.
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    /// Long-polls for new updates. Pass the last seen `update_id + 1` as
    /// `offset` to acknowledge everything before it.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, DeliveryError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: ["message"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;
        debug!("Received {} updates", updates.len());
        Ok(updates)
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, DeliveryError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let envelope = serde_json::from_str::<ApiEnvelope<T>>(&text).ok();

        match envelope {
            Some(ApiEnvelope {
                ok: true,
                result: Some(result),
                ..
            }) if status.is_success() => Ok(result),
            Some(envelope) => Err(DeliveryError::Api {
                status: status.as_u16(),
                description: envelope
                    .description
                    .unwrap_or_else(|| format!("{method} returned no result")),
            }),
            None => Err(DeliveryError::Api {
                status: status.as_u16(),
                description: text,
            }),
        }
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        let _: serde_json::Value = self
            .call("sendMessage", &SendMessageRequest { chat_id, text })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TelegramClient {
        TelegramClient::new(&server.uri(), "123:abc", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_message_posts_chat_id_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({"chat_id": 42, "text": "hello"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "result": {"message_id": 1}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).send_message(42, "hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_message_maps_blocked_bot_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&server)
            .await;

        match client_for(&server).send_message(42, "hello").await {
            Err(DeliveryError::Api {
                status,
                description,
            }) => {
                assert_eq!(status, 403);
                assert!(description.contains("blocked"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_message_rejects_non_json_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server).send_message(1, "x").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Api { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_get_updates_parses_text_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/getUpdates"))
            .and(body_partial_json(json!({"offset": 7, "timeout": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    {"update_id": 7, "message": {"message_id": 1, "chat": {"id": 99, "type": "private"}, "text": "/subscribe"}},
                    {"update_id": 8, "edited_message": {"message_id": 2, "chat": {"id": 99}}}
                ]
            })))
            .mount(&server)
            .await;

        let updates = client_for(&server).get_updates(Some(7), 0).await.unwrap();
        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 99);
        assert_eq!(message.text.as_deref(), Some("/subscribe"));
        assert!(updates[1].message.is_none());
    }
}
