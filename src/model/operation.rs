//! Operations: the per-vessel task list entries.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single task on a vessel's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    pub id: Uuid,
    pub description: String,

    /// 1–10, lower is more urgent. Lists are kept sorted ascending.
    pub priority: u8,

    pub status: OpStatus,
}

impl Default for Operation {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            description: String::new(),
            priority: 1,
            status: OpStatus::Pending,
        }
    }
}

impl Operation {
    pub fn new(description: impl Into<String>, priority: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            priority,
            status: OpStatus::Pending,
        }
    }
}

/// Where an operation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpStatus {
    #[default]
    Pending,
    Completed,
    Canceled,
}

impl fmt::Display for OpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        };
        f.write_str(s)
    }
}

/// The status-button transition: requesting the status an operation
/// already has reverts it to pending, anything else sets the request.
///
/// Modeled as a pure function so the toggle law is testable on its own.
pub fn next_status(current: OpStatus, requested: OpStatus) -> OpStatus {
    if current == requested {
        OpStatus::Pending
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requesting_current_status_reverts_to_pending() {
        assert_eq!(
            next_status(OpStatus::Completed, OpStatus::Completed),
            OpStatus::Pending
        );
        assert_eq!(
            next_status(OpStatus::Canceled, OpStatus::Canceled),
            OpStatus::Pending
        );
    }

    #[test]
    fn requesting_other_status_applies_it() {
        assert_eq!(
            next_status(OpStatus::Pending, OpStatus::Completed),
            OpStatus::Completed
        );
        assert_eq!(
            next_status(OpStatus::Completed, OpStatus::Canceled),
            OpStatus::Canceled
        );
    }

    #[test]
    fn double_request_is_identity_on_pending() {
        // Two presses of the same button land back on pending.
        let after_one = next_status(OpStatus::Pending, OpStatus::Canceled);
        assert_eq!(next_status(after_one, OpStatus::Canceled), OpStatus::Pending);
    }
}
