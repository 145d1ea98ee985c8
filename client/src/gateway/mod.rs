//! Backend access for the chat client.
//!
//! The controllers only see the traits below; [`HttpGateway`] is the REST
//! implementation used in production, tests substitute scripted fakes.

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use chatline_messaging::account::{Credentials, LoginResponse, Registration};
use chatline_messaging::contacts::{
    AcceptFriendRequest, FriendRequest, RejectFriendRequest, UserProfile,
};
use chatline_messaging::{Message, MessageId, OutboundMessage, UserId};
use std::future::Future;
use std::time::Duration;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Bounds a gateway call so no operation stays pending forever.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> GatewayResult<T>
where
    F: Future<Output = GatewayResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout),
    }
}

/// Message-thread endpoints.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// `GET /messages/{userId}/{recipientId}`
    async fn fetch_messages(&self, user_id: &UserId, recipient_id: &UserId)
        -> GatewayResult<Vec<Message>>;

    /// `GET /user/{userId}`
    async fn fetch_user(&self, user_id: &UserId) -> GatewayResult<UserProfile>;

    async fn send_message(&self, message: &OutboundMessage) -> GatewayResult<()>;

    /// `POST /deleteMessages`
    async fn delete_messages(&self, ids: &[MessageId]) -> GatewayResult<()>;
}

/// Friends list and friend request endpoints.
#[async_trait]
pub trait ContactsGateway: Send + Sync {
    async fn fetch_friends(&self, user_id: &UserId) -> GatewayResult<Vec<UserProfile>>;

    async fn fetch_friend_requests(&self, user_id: &UserId) -> GatewayResult<Vec<FriendRequest>>;

    async fn accept_friend_request(&self, request: &AcceptFriendRequest) -> GatewayResult<()>;

    async fn reject_friend_request(&self, request: &RejectFriendRequest) -> GatewayResult<()>;
}

/// Login and registration endpoints.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> GatewayResult<LoginResponse>;

    async fn register(&self, registration: &Registration) -> GatewayResult<()>;
}
