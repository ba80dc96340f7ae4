use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Subscriber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Required for every event operation.
    ManageOptions,
}

impl Role {
    pub fn can(self, cap: Capability) -> bool {
        match (self, cap) {
            (Role::Administrator, Capability::ManageOptions) => true,
            (Role::Subscriber, Capability::ManageOptions) => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Subscriber => "subscriber",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "administrator" => Some(Role::Administrator),
            "subscriber" => Some(Role::Subscriber),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot status shown on the next admin page render.
/// Travels between requests as its short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EventAdded,
    EventAddFailed,
    EventDeleted,
    EventDeleteFailed,
    InvalidInput,
}

impl Notice {
    pub fn code(self) -> &'static str {
        match self {
            Notice::EventAdded => "event_added",
            Notice::EventAddFailed => "event_add_failed",
            Notice::EventDeleted => "event_deleted",
            Notice::EventDeleteFailed => "event_delete_failed",
            Notice::InvalidInput => "invalid_input",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "event_added" => Some(Notice::EventAdded),
            "event_add_failed" => Some(Notice::EventAddFailed),
            "event_deleted" => Some(Notice::EventDeleted),
            "event_delete_failed" => Some(Notice::EventDeleteFailed),
            "invalid_input" => Some(Notice::InvalidInput),
            _ => None,
        }
    }

    pub fn kind(self) -> NoticeKind {
        match self {
            Notice::EventAdded | Notice::EventDeleted => NoticeKind::Success,
            Notice::EventAddFailed | Notice::EventDeleteFailed | Notice::InvalidInput => {
                NoticeKind::Error
            }
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::EventAdded => "Event added successfully.",
            Notice::EventAddFailed => "Failed to save the event.",
            Notice::EventDeleted => "Event deleted successfully.",
            Notice::EventDeleteFailed => "Failed to delete the event.",
            Notice::InvalidInput => "Please fill in a name, a valid date and a description.",
        }
    }
}
