//! State and lifecycle of one open conversation.

mod controller;
mod events;
mod state;

pub use controller::{ChatThreadController, LoadOutcome};
pub use events::ThreadEvent;
pub use state::{ApplyOutcome, ConversationState};

use crate::gateway::GatewayError;
use chatline_messaging::MessageId;

/// Errors surfaced by [`ChatThreadController`] operations.
///
/// A failed operation never leaves the conversation partially updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThreadError {
    #[error("could not load messages: {0}")]
    Fetch(GatewayError),
    #[error("could not send message: {0}")]
    Send(GatewayError),
    #[error("could not delete messages: {0}")]
    Delete(GatewayError),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("a message is already being sent")]
    ConcurrentSend,
    #[error("no messages selected")]
    EmptySelection,
    #[error("message {0} is not part of this conversation")]
    UnknownMessage(MessageId),
}

impl ThreadError {
    /// Whether a retry may succeed without changing the input.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ThreadError::Fetch(_) | ThreadError::Send(_) | ThreadError::Delete(_)
        )
    }
}

pub type ThreadResult<T> = Result<T, ThreadError>;
