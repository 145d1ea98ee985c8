//! Outbound messages: content the user is about to send, before the backend
//! has assigned an id and timestamp.

use crate::{MessageKind, ModelError, Result, UserId};
use uuid::Uuid;

/// Payload of a message that has not been sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundContent {
    Text(String),
    Image {
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

impl OutboundContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            OutboundContent::Text(_) => MessageKind::Text,
            OutboundContent::Image { .. } => MessageKind::Image,
        }
    }

    /// Rejects blank text and empty image uploads.
    pub fn validate(&self) -> Result<()> {
        match self {
            OutboundContent::Text(text) if text.trim().is_empty() => Err(ModelError::Validation(
                "message text is empty".to_string(),
            )),
            OutboundContent::Image { bytes, .. } if bytes.is_empty() => Err(
                ModelError::Validation("image payload is empty".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// An accepted, not yet acknowledged send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Local key identifying this send until the server copy is fetched.
    pub local_key: Uuid,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub content: OutboundContent,
    pub created_ms: i64,
}

impl OutboundMessage {
    pub fn new(sender_id: UserId, recipient_id: UserId, content: OutboundContent) -> Result<Self> {
        if recipient_id.is_blank() {
            return Err(ModelError::Validation("recipient not selected".to_string()));
        }
        content.validate()?;

        let created_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64;

        Ok(Self {
            local_key: Uuid::new_v4(),
            sender_id,
            recipient_id,
            content,
            created_ms,
        })
    }

    pub fn kind(&self) -> MessageKind {
        self.content.kind()
    }
}
