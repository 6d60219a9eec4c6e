#![forbid(unsafe_code)]

//! Engine error model.
//!
//! Mutation primitives surface their errors synchronously to the caller and
//! never partially apply. Registry errors that occur while handling a drop are
//! not raised: [`SortableList::handle_drop`](crate::SortableList::handle_drop)
//! folds them into [`DropOutcome::Discarded`](crate::DropOutcome::Discarded)
//! and logs them, because the gesture has already completed on the client.

use thiserror::Error;

use crate::id::ListId;

/// Standard result type for engine APIs.
pub type Result<T> = std::result::Result<T, SortableError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortableError {
    /// An index argument falls outside the valid range of its target list.
    #[error("index {index} out of range for list {list} (len {len})")]
    IndexOutOfRange {
        list: ListId,
        index: usize,
        len: usize,
    },

    /// A drop referenced a list that is no longer registered.
    #[error("unknown list {0}")]
    UnknownList(ListId),

    /// The same list was registered under two different ids.
    #[error("list {list} is already registered as {existing}")]
    DuplicateRegistration { list: ListId, existing: ListId },

    /// A different live list already holds this id.
    #[error("id {0} is already held by another list")]
    IdCollision(ListId),

    /// Cross-group drop refused under [`CrossGroupPolicy::Reject`](crate::CrossGroupPolicy::Reject).
    #[error("drop from {from} (group {from_group}) into {to} (group {to_group}) rejected")]
    GroupMismatch {
        from: ListId,
        from_group: String,
        to: ListId,
        to_group: String,
    },

    /// The list is mid-operation; a callback tried to re-enter it.
    #[error("list {0} is busy")]
    Busy(ListId),

    /// Items and visual children fell out of step.
    #[error("list {list} has {items} items but {children} children")]
    InvariantViolation {
        list: ListId,
        items: usize,
        children: usize,
    },

    /// A raw list id could not be parsed.
    #[error("invalid list id: {0:?}")]
    InvalidListId(String),
}

impl SortableError {
    /// Whether the host can carry on after this error.
    ///
    /// Registration conflicts and invariant violations are lifecycle bugs in
    /// the embedding application; everything else is an expected race or a
    /// bad argument.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::DuplicateRegistration { .. } | Self::IdCollision(_) | Self::InvariantViolation { .. }
        )
    }

    /// Error type label for log fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "index",
            Self::UnknownList(_) => "unknown_list",
            Self::DuplicateRegistration { .. } | Self::IdCollision(_) => "registration",
            Self::GroupMismatch { .. } => "group",
            Self::Busy(_) => "busy",
            Self::InvariantViolation { .. } => "invariant",
            Self::InvalidListId(_) => "invalid_id",
        }
    }

    pub(crate) fn index(list: ListId, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { list, index, len }
    }
}
