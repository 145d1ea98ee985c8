//! Message, contact, and account models shared across Chatline clients.
//!
//! The types here mirror the JSON documents exchanged with the chat backend.
//! Wire spellings (`_id`, `recepientId`, `timeStamp`) stay on the serde
//! attributes so the rest of the code can use plain Rust names.

pub mod account;
pub mod contacts;
pub mod outbound;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use outbound::{OutboundContent, OutboundMessage};

/// Backend-assigned identifier of a single message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Backend-assigned identifier of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is empty or only whitespace, i.e. nobody is selected.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Kind of content a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a stored message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    /// Server-relative path of the uploaded image.
    Image { url: String },
}

/// A message as stored and returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireMessage", into = "WireMessage")]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub body: MessageBody,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self.body {
            MessageBody::Text(_) => MessageKind::Text,
            MessageBody::Image { .. } => MessageKind::Image,
        }
    }

    /// Whether `user` authored this message.
    pub fn is_sent_by(&self, user: &UserId) -> bool {
        &self.sender_id == user
    }
}

/// Participant reference; the backend sometimes populates the full user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ParticipantRef {
    Id(UserId),
    Populated {
        #[serde(rename = "_id")]
        id: UserId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl ParticipantRef {
    fn into_id(self) -> UserId {
        match self {
            ParticipantRef::Id(id) => id,
            ParticipantRef::Populated { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    #[serde(rename = "_id")]
    id: MessageId,
    #[serde(rename = "senderId")]
    sender: ParticipantRef,
    #[serde(rename = "recepientId")]
    recipient: ParticipantRef,
    #[serde(rename = "messageType")]
    kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(rename = "timeStamp")]
    timestamp: DateTime<Utc>,
}

impl TryFrom<WireMessage> for Message {
    type Error = ModelError;

    fn try_from(wire: WireMessage) -> Result<Self> {
        let body = match wire.kind {
            MessageKind::Text => MessageBody::Text(wire.message.ok_or_else(|| {
                ModelError::MissingField {
                    id: wire.id.to_string(),
                    field: "message",
                }
            })?),
            MessageKind::Image => MessageBody::Image {
                url: wire.image_url.ok_or_else(|| ModelError::MissingField {
                    id: wire.id.to_string(),
                    field: "imageUrl",
                })?,
            },
        };

        Ok(Self {
            id: wire.id,
            sender_id: wire.sender.into_id(),
            recipient_id: wire.recipient.into_id(),
            body,
            timestamp: wire.timestamp,
        })
    }
}

impl From<Message> for WireMessage {
    fn from(message: Message) -> Self {
        let kind = message.kind();
        let (text, image_url) = match message.body {
            MessageBody::Text(text) => (Some(text), None),
            MessageBody::Image { url } => (None, Some(url)),
        };
        Self {
            id: message.id,
            sender: ParticipantRef::Id(message.sender_id),
            recipient: ParticipantRef::Id(message.recipient_id),
            kind,
            message: text,
            image_url,
            timestamp: message.timestamp,
        }
    }
}

/// Body of `POST /deleteMessages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteMessagesRequest {
    pub messages: Vec<MessageId>,
}

/// Model-level errors: malformed payloads and rejected local input.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("message {id} is missing `{field}`")]
    MissingField { id: String, field: &'static str },
    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
