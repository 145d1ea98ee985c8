//! Conversation state for a single thread and the transitions applied to it.
//!
//! Every method here is a complete transition: the controller calls exactly
//! one of them per completion while holding the state lock.

use chatline_messaging::contacts::UserProfile;
use chatline_messaging::{Message, MessageId, OutboundMessage};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Result of applying a fetched message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { count: usize, deselected: usize },
    /// A newer load was applied first; the payload was dropped.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
    selected: BTreeSet<MessageId>,
    pending_send: Option<OutboundMessage>,
    draft: String,
    recipient: Option<UserProfile>,
    issued_seq: u64,
    applied_seq: u64,
    /// Deleted ids, keyed to the last load issued before their delete.
    tombstones: HashMap<MessageId, u64>,
}

impl ConversationState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn selected(&self) -> &BTreeSet<MessageId> {
        &self.selected
    }

    pub fn is_selected(&self, id: &MessageId) -> bool {
        self.selected.contains(id)
    }

    pub fn pending_send(&self) -> Option<&OutboundMessage> {
        self.pending_send.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn recipient(&self) -> Option<&UserProfile> {
        self.recipient.as_ref()
    }

    /// Sequence number of the last applied load.
    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    /// `selected` only references messages that are present.
    pub fn selection_is_consistent(&self) -> bool {
        self.selected.iter().all(|id| self.contains(id))
    }

    pub(crate) fn begin_load(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    pub(crate) fn apply_messages(&mut self, seq: u64, messages: Vec<Message>) -> ApplyOutcome {
        if seq <= self.applied_seq {
            return ApplyOutcome::Stale;
        }
        self.applied_seq = seq;
        let tombstones = &self.tombstones;
        let mut messages = normalize(messages);
        messages.retain(|m| tombstones.get(&m.id).map_or(true, |&mark| seq > mark));
        self.messages = messages;
        // Loads at or below `seq` are stale from now on.
        self.tombstones.retain(|_, mark| *mark > seq);

        let before = self.selected.len();
        let present: HashSet<&MessageId> = self.messages.iter().map(|m| &m.id).collect();
        self.selected.retain(|id| present.contains(id));

        ApplyOutcome::Applied {
            count: self.messages.len(),
            deselected: before - self.selected.len(),
        }
    }

    /// Flips selection of `id`; `None` when the message is not in the thread.
    pub(crate) fn toggle(&mut self, id: &MessageId) -> Option<bool> {
        if !self.contains(id) {
            return None;
        }
        if self.selected.remove(id) {
            Some(false)
        } else {
            self.selected.insert(id.clone());
            Some(true)
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Drops `ids` from both the message list and the selection.
    ///
    /// Loads issued before the delete completed still apply, minus these ids,
    /// so a snapshot taken before the delete cannot bring them back.
    pub(crate) fn remove_messages(&mut self, ids: &[MessageId]) -> usize {
        let doomed: HashSet<&MessageId> = ids.iter().collect();
        let before = self.messages.len();
        self.messages.retain(|m| !doomed.contains(&m.id));
        self.selected.retain(|id| !doomed.contains(id));
        if self.issued_seq > self.applied_seq {
            for id in ids {
                self.tombstones.insert(id.clone(), self.issued_seq);
            }
        }
        before - self.messages.len()
    }

    pub(crate) fn set_pending(&mut self, outbound: OutboundMessage) {
        self.pending_send = Some(outbound);
    }

    pub(crate) fn take_pending(&mut self) -> Option<OutboundMessage> {
        self.pending_send.take()
    }

    pub(crate) fn set_draft(&mut self, text: String) {
        self.draft = text;
    }

    pub(crate) fn clear_draft_if(&mut self, sent: &str) {
        if self.draft == sent {
            self.draft.clear();
        }
    }

    pub(crate) fn set_recipient(&mut self, profile: UserProfile) {
        self.recipient = Some(profile);
    }
}

/// Keeps server order for equal timestamps, drops duplicate ids.
fn normalize(mut messages: Vec<Message>) -> Vec<Message> {
    messages.sort_by_key(|m| m.timestamp);
    let mut seen = HashSet::new();
    messages.retain(|m| seen.insert(m.id.clone()));
    messages
}
