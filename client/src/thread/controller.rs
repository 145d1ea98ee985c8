//! Controller mediating between UI events and the backend for one thread.

use super::events::ThreadEvent;
use super::state::{ApplyOutcome, ConversationState};
use super::{ThreadError, ThreadResult};
use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::gateway::{with_timeout, BackendGateway};
use chatline_messaging::{MessageId, OutboundContent, OutboundMessage, UserId};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 128;

/// What a completed `load_messages` did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer load finished first; this response was discarded.
    Superseded,
}

/// Owns the message list, selection, draft and send state of one
/// conversation between `user_id` and `recipient_id`.
///
/// Operations take `&self` and may overlap on the same task. The state lock
/// is only held between awaits, so each completion is applied as a single
/// transition.
pub struct ChatThreadController {
    user_id: UserId,
    recipient_id: UserId,
    gateway: Arc<dyn BackendGateway>,
    request_timeout: Duration,
    state: Mutex<ConversationState>,
    event_tx: broadcast::Sender<ThreadEvent>,
}

impl ChatThreadController {
    pub fn new(user_id: UserId, recipient_id: UserId, gateway: Arc<dyn BackendGateway>) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            user_id,
            recipient_id,
            gateway,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            state: Mutex::new(ConversationState::default()),
            event_tx,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn recipient_id(&self) -> &UserId {
        &self.recipient_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ThreadEvent> {
        self.event_tx.subscribe()
    }

    /// Consistent copy of the current state for rendering.
    pub fn snapshot(&self) -> ConversationState {
        self.state().clone()
    }

    pub fn is_sending(&self) -> bool {
        self.state().pending_send().is_some()
    }

    pub fn selected_count(&self) -> usize {
        self.state().selected().len()
    }

    pub fn draft(&self) -> String {
        self.state().draft().to_string()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        let mut state = self.state();
        state.set_draft(text.into());
        self.emit(ThreadEvent::DraftChanged);
    }

    /// Loads recipient profile and messages concurrently.
    ///
    /// A missing profile only degrades the header, so its failure is logged
    /// and the message load result is returned.
    pub async fn open(&self) -> ThreadResult<LoadOutcome> {
        let (recipient, messages) = tokio::join!(self.load_recipient(), self.load_messages());
        if let Err(err) = recipient {
            warn!(recipient = %self.recipient_id, %err, "failed to load recipient profile");
        }
        messages
    }

    /// Replaces the message list with the backend's copy.
    pub async fn load_messages(&self) -> ThreadResult<LoadOutcome> {
        let seq = self.state().begin_load();
        debug!(seq, recipient = %self.recipient_id, "loading messages");

        let result = with_timeout(
            self.request_timeout,
            self.gateway.fetch_messages(&self.user_id, &self.recipient_id),
        )
        .await;

        match result {
            Ok(messages) => {
                let mut state = self.state();
                match state.apply_messages(seq, messages) {
                    ApplyOutcome::Applied { count, deselected } => {
                        debug!(seq, count, deselected, "messages applied");
                        self.emit(ThreadEvent::MessagesReplaced {
                            seq,
                            count,
                            deselected,
                        });
                        Ok(LoadOutcome::Applied { count })
                    }
                    ApplyOutcome::Stale => {
                        debug!(seq, applied = state.applied_seq(), "discarding stale messages");
                        self.emit(ThreadEvent::LoadSuperseded { seq });
                        Ok(LoadOutcome::Superseded)
                    }
                }
            }
            Err(err) => {
                warn!(seq, %err, "failed to load messages");
                self.emit(ThreadEvent::LoadFailed {
                    reason: err.to_string(),
                });
                Err(ThreadError::Fetch(err))
            }
        }
    }

    pub async fn retry(&self) -> ThreadResult<LoadOutcome> {
        self.load_messages().await
    }

    pub async fn load_recipient(&self) -> ThreadResult<()> {
        let profile = with_timeout(self.request_timeout, self.gateway.fetch_user(&self.recipient_id))
            .await
            .map_err(ThreadError::Fetch)?;

        let name = profile.display_name().to_string();
        self.state().set_recipient(profile);
        self.emit(ThreadEvent::RecipientLoaded { name });
        Ok(())
    }

    /// Sends the current draft as a text message.
    pub async fn send_draft(&self) -> ThreadResult<Uuid> {
        let draft = self.draft();
        self.send(OutboundContent::Text(draft)).await
    }

    /// Sends `content`, then reloads the thread from the backend.
    ///
    /// Only one send may be in flight; a second call fails immediately with
    /// [`ThreadError::ConcurrentSend`]. Returns the local key of the send.
    pub async fn send(&self, content: OutboundContent) -> ThreadResult<Uuid> {
        let outbound = {
            let mut state = self.state();
            let outbound =
                OutboundMessage::new(self.user_id.clone(), self.recipient_id.clone(), content)
                    .map_err(|e| ThreadError::Validation(e.to_string()))?;
            if let Some(pending) = state.pending_send() {
                debug!(pending = %pending.local_key, "send rejected, another send is in flight");
                return Err(ThreadError::ConcurrentSend);
            }
            state.set_pending(outbound.clone());
            self.emit(ThreadEvent::SendStarted {
                local_key: outbound.local_key,
            });
            outbound
        };
        let local_key = outbound.local_key;
        debug!(
            %local_key,
            kind = %outbound.kind(),
            created_ms = outbound.created_ms,
            "sending message"
        );

        let result = with_timeout(self.request_timeout, self.gateway.send_message(&outbound)).await;

        {
            let mut state = self.state();
            state.take_pending();
            match &result {
                Ok(()) => {
                    if let OutboundContent::Text(text) = &outbound.content {
                        state.clear_draft_if(text);
                    }
                    self.emit(ThreadEvent::SendCompleted { local_key });
                }
                Err(err) => {
                    self.emit(ThreadEvent::SendFailed {
                        local_key,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if let Err(err) = result {
            warn!(%local_key, %err, "failed to send message");
            return Err(ThreadError::Send(err));
        }

        info!(%local_key, recipient = %self.recipient_id, "message sent");
        if let Err(err) = self.load_messages().await {
            // The send itself succeeded; the failed refresh was already
            // published as `LoadFailed`.
            debug!(%local_key, %err, "refresh after send failed");
        }
        Ok(local_key)
    }

    /// Flips selection of `id`, returning whether it is now selected.
    pub fn toggle_select(&self, id: &MessageId) -> ThreadResult<bool> {
        let mut state = self.state();
        let selected = state
            .toggle(id)
            .ok_or_else(|| ThreadError::UnknownMessage(id.clone()))?;
        self.emit(ThreadEvent::SelectionChanged {
            selected: state.selected().len(),
        });
        Ok(selected)
    }

    pub fn clear_selection(&self) {
        let mut state = self.state();
        state.clear_selection();
        self.emit(ThreadEvent::SelectionChanged { selected: 0 });
    }

    /// Deletes every selected message on the backend, drops them locally in
    /// one transition, then reloads the thread.
    pub async fn delete_selected(&self) -> ThreadResult<usize> {
        let ids: Vec<MessageId> = {
            let state = self.state();
            if state.selected().is_empty() {
                return Err(ThreadError::EmptySelection);
            }
            state.selected().iter().cloned().collect()
        };
        debug!(count = ids.len(), "deleting selected messages");

        if let Err(err) = with_timeout(self.request_timeout, self.gateway.delete_messages(&ids)).await {
            warn!(%err, "failed to delete messages");
            self.emit(ThreadEvent::DeleteFailed {
                reason: err.to_string(),
            });
            return Err(ThreadError::Delete(err));
        }

        let removed = self.state().remove_messages(&ids);
        info!(removed, "messages deleted");
        self.emit(ThreadEvent::MessagesDeleted { ids });

        if let Err(err) = self.load_messages().await {
            debug!(removed, %err, "refresh after delete failed");
        }
        Ok(removed)
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        // Transitions never panic halfway, so a poisoned lock still guards
        // consistent state.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: ThreadEvent) {
        let _ = self.event_tx.send(event);
    }
}
