use chatline_messaging::MessageId;
use uuid::Uuid;

/// Notifications published after each conversation state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadEvent {
    MessagesReplaced {
        seq: u64,
        count: usize,
        deselected: usize,
    },
    LoadSuperseded {
        seq: u64,
    },
    LoadFailed {
        reason: String,
    },
    RecipientLoaded {
        name: String,
    },
    SelectionChanged {
        selected: usize,
    },
    DraftChanged,
    SendStarted {
        local_key: Uuid,
    },
    SendCompleted {
        local_key: Uuid,
    },
    SendFailed {
        local_key: Uuid,
        reason: String,
    },
    MessagesDeleted {
        ids: Vec<MessageId>,
    },
    DeleteFailed {
        reason: String,
    },
}
