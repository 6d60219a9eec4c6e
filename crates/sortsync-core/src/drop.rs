#![forbid(unsafe_code)]

//! Drop notifications and their resolution.
//!
//! The host reports a finished drag as a [`RawDrop`] carrying only ids and
//! indices. [`resolve_drop`] turns it into a [`DropEvent`] with live handles
//! for both lists, failing with
//! [`SortableError::UnknownList`](crate::SortableError::UnknownList) if either
//! id is stale. Resolution never retries: a stale id means the list was
//! disposed and nothing correct is left to reconcile.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SortableError};
use crate::id::ListId;
use crate::list::SortableList;
use crate::registry::ListRegistry;

/// Drag-completion notification as the host delivers it.
///
/// List ids may arrive as numbers or as the `"s{n}"` element ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDrop {
    pub old_list: ListId,
    pub new_list: ListId,
    pub old_index: usize,
    pub new_index: usize,
}

impl RawDrop {
    #[must_use]
    pub const fn new(old_list: ListId, new_list: ListId, old_index: usize, new_index: usize) -> Self {
        Self {
            old_list,
            new_list,
            old_index,
            new_index,
        }
    }
}

/// A drop with both endpoints resolved to live lists.
///
/// Handed to `on_drop` callbacks before reconciliation: the moved item is
/// still at `old_list[old_index]`.
pub struct DropEvent<T, C> {
    pub new_list: SortableList<T, C>,
    pub old_list: SortableList<T, C>,
    pub old_index: usize,
    pub new_index: usize,
}

impl<T, C> fmt::Debug for DropEvent<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropEvent")
            .field("new_list", &self.new_list.id())
            .field("old_list", &self.old_list.id())
            .field("old_index", &self.old_index)
            .field("new_index", &self.new_index)
            .finish()
    }
}

impl<T, C> DropEvent<T, C> {
    /// Typed move derived from this event.
    #[must_use]
    pub fn instruction(&self) -> MoveInstruction {
        MoveInstruction {
            source: self.old_list.id(),
            dest: self.new_list.id(),
            source_index: self.old_index,
            dest_index: self.new_index,
        }
    }

    /// Whether the drop stays within one list.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.old_list == self.new_list
    }
}

impl<T: Clone + 'static, C: 'static> DropEvent<T, C> {
    /// The dragged item, read from its old position.
    ///
    /// Only meaningful before reconciliation, i.e. inside `on_drop`.
    #[must_use]
    pub fn moved_item(&self) -> Option<T> {
        self.old_list.get(self.old_index)
    }
}

/// Ephemeral, fully typed move: created per drop, consumed by exactly one
/// reconciliation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInstruction {
    pub source: ListId,
    pub dest: ListId,
    pub source_index: usize,
    pub dest_index: usize,
}

/// Result of [`SortableList::handle_drop`](crate::SortableList::handle_drop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Reordered within one list.
    Internal(MoveInstruction),
    /// Moved across two lists.
    External(MoveInstruction),
    /// Same list, same index: nothing to do.
    Unchanged(MoveInstruction),
    /// The receiving list is neither endpoint; only the callback ran.
    NotInvolved(MoveInstruction),
    /// The drop could not be applied and was dropped.
    Discarded(SortableError),
}

impl DropOutcome {
    /// Whether any list changed.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Internal(_) | Self::External(_))
    }

    #[must_use]
    pub fn instruction(&self) -> Option<&MoveInstruction> {
        match self {
            Self::Internal(m) | Self::External(m) | Self::Unchanged(m) | Self::NotInvolved(m) => {
                Some(m)
            }
            Self::Discarded(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&SortableError> {
        match self {
            Self::Discarded(err) => Some(err),
            _ => None,
        }
    }
}

/// Resolve both ids of `raw` through `registry`.
pub fn resolve_drop<T: Clone + 'static, C: 'static>(
    registry: &ListRegistry<T, C>,
    raw: RawDrop,
) -> Result<DropEvent<T, C>> {
    let new_list = registry.resolve(raw.new_list)?;
    let old_list = registry.resolve(raw.old_list)?;
    Ok(DropEvent {
        new_list,
        old_list,
        old_index: raw.old_index,
        new_index: raw.new_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListOptions;

    fn numbers(registry: &ListRegistry<u32, u32>, items: Vec<u32>) -> SortableList<u32, u32> {
        SortableList::new(registry, items, |n: &u32| *n, ListOptions::new())
    }

    #[test]
    fn raw_drop_parses_host_payload() {
        let raw: RawDrop = serde_json::from_str(
            r#"{"new_index":0,"old_index":1,"new_list":"s4","old_list":3}"#,
        )
        .unwrap();
        assert_eq!(raw, RawDrop::new(ListId(3), ListId(4), 1, 0));
    }

    #[test]
    fn resolves_both_endpoints() {
        let registry = ListRegistry::new();
        let a = numbers(&registry, vec![1, 2]);
        let b = numbers(&registry, vec![]);
        let event = resolve_drop(&registry, RawDrop::new(a.id(), b.id(), 1, 0)).unwrap();
        assert_eq!(event.old_list, a);
        assert_eq!(event.new_list, b);
        assert!(!event.is_internal());
        assert_eq!(event.moved_item(), Some(2));
        assert_eq!(
            event.instruction(),
            MoveInstruction {
                source: a.id(),
                dest: b.id(),
                source_index: 1,
                dest_index: 0,
            }
        );
    }

    #[test]
    fn stale_id_fails_resolution() {
        let registry = ListRegistry::new();
        let a = numbers(&registry, vec![1]);
        let b = numbers(&registry, vec![]);
        b.dispose();
        let err = resolve_drop(&registry, RawDrop::new(a.id(), b.id(), 0, 0)).unwrap_err();
        assert_eq!(err, SortableError::UnknownList(b.id()));
        let err = resolve_drop(&registry, RawDrop::new(ListId(99), a.id(), 0, 0)).unwrap_err();
        assert_eq!(err, SortableError::UnknownList(ListId(99)));
    }

    #[test]
    fn outcome_accessors() {
        let m = MoveInstruction {
            source: ListId(0),
            dest: ListId(0),
            source_index: 1,
            dest_index: 1,
        };
        assert!(!DropOutcome::Unchanged(m).is_applied());
        assert!(DropOutcome::Internal(m).is_applied());
        assert_eq!(DropOutcome::NotInvolved(m).instruction(), Some(&m));
        let discarded = DropOutcome::Discarded(SortableError::UnknownList(ListId(1)));
        assert!(discarded.instruction().is_none());
        assert_eq!(
            discarded.error(),
            Some(&SortableError::UnknownList(ListId(1)))
        );
    }
}
