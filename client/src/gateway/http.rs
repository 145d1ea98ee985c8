//! REST implementation of the gateway traits.

use super::{AccountGateway, BackendGateway, ContactsGateway, GatewayError, GatewayResult};
use crate::config::ClientConfig;
use async_trait::async_trait;
use chatline_messaging::account::{Credentials, LoginResponse, Registration};
use chatline_messaging::contacts::{
    AcceptFriendRequest, FriendRequest, RejectFriendRequest, UserProfile,
};
use chatline_messaging::{
    DeleteMessagesRequest, Message, MessageId, OutboundContent, OutboundMessage, UserId,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the chat backend.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins percent-encoded path segments onto the base URL.
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> GatewayResult<T> {
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: String, body: &B) -> GatewayResult<Response> {
        debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        ensure_success(response).await
    }
}

/// Turns a non-2xx response into [`GatewayError::Status`], preferring the
/// backend's `message` field over the raw body.
async fn ensure_success(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            }
        });

    Err(GatewayError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
}

fn message_form(message: &OutboundMessage) -> GatewayResult<Form> {
    let form = Form::new()
        .text("senderId", message.sender_id.to_string())
        .text("recepientId", message.recipient_id.to_string())
        .text("messageType", message.kind().as_str());

    let form = match &message.content {
        OutboundContent::Text(text) => form.text("messageText", text.clone()),
        OutboundContent::Image {
            file_name,
            mime_type,
            bytes,
        } => {
            let part = Part::bytes(bytes.clone())
                .file_name(file_name.clone())
                .mime_str(mime_type)
                .map_err(|e| GatewayError::Transport(format!("invalid image mime type: {e}")))?;
            form.part("imageFile", part)
        }
    };
    Ok(form)
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn fetch_messages(
        &self,
        user_id: &UserId,
        recipient_id: &UserId,
    ) -> GatewayResult<Vec<Message>> {
        self.get_json(self.url(&["messages", user_id.as_str(), recipient_id.as_str()]))
            .await
    }

    async fn fetch_user(&self, user_id: &UserId) -> GatewayResult<UserProfile> {
        self.get_json(self.url(&["user", user_id.as_str()])).await
    }

    async fn send_message(&self, message: &OutboundMessage) -> GatewayResult<()> {
        let url = self.url(&["messages"]);
        debug!(%url, local_key = %message.local_key, kind = %message.kind(), "POST multipart");
        let response = self
            .client
            .post(&url)
            .multipart(message_form(message)?)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_messages(&self, ids: &[MessageId]) -> GatewayResult<()> {
        let body = DeleteMessagesRequest {
            messages: ids.to_vec(),
        };
        self.post_json(self.url(&["deleteMessages"]), &body).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactsGateway for HttpGateway {
    async fn fetch_friends(&self, user_id: &UserId) -> GatewayResult<Vec<UserProfile>> {
        self.get_json(self.url(&["friends-with-details", user_id.as_str()]))
            .await
    }

    async fn fetch_friend_requests(&self, user_id: &UserId) -> GatewayResult<Vec<FriendRequest>> {
        self.get_json(self.url(&["friend-request", user_id.as_str()]))
            .await
    }

    async fn accept_friend_request(&self, request: &AcceptFriendRequest) -> GatewayResult<()> {
        self.post_json(self.url(&["friend-request", "accept"]), request)
            .await?;
        Ok(())
    }

    async fn reject_friend_request(&self, request: &RejectFriendRequest) -> GatewayResult<()> {
        self.post_json(self.url(&["friend-request", "reject"]), request)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AccountGateway for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> GatewayResult<LoginResponse> {
        let response = self.post_json(self.url(&["login"]), credentials).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn register(&self, registration: &Registration) -> GatewayResult<()> {
        self.post_json(self.url(&["register"]), registration).await?;
        Ok(())
    }
}
