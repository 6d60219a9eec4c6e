#![forbid(unsafe_code)]

//! Registry of live sortable lists.
//!
//! Maps [`ListId`]s to the lists currently on screen so that a drop
//! notification, which only carries ids, can be resolved to both endpoints.
//!
//! # Invariants
//!
//! 1. The registry never owns a list. Entries are `Weak`; a list whose last
//!    handle is dropped becomes unresolvable even without an explicit
//!    [`unregister`](ListRegistry::unregister).
//! 2. Ids are handed out by a monotonically increasing counter and are never
//!    reissued by the same registry.
//! 3. A list appears under at most one id.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::SortableConfig;
use crate::error::{Result, SortableError};
use crate::id::ListId;
use crate::list::{ListCell, SortableList};

struct RegistryState<T, C> {
    next_id: u64,
    config: SortableConfig,
    live: HashMap<ListId, Weak<ListCell<T, C>>>,
}

/// Shared, cloneable handle to the list table.
///
/// Clones refer to the same table. A host normally creates one registry per
/// session and builds every interchangeable list on it.
pub struct ListRegistry<T, C> {
    inner: Rc<RefCell<RegistryState<T, C>>>,
}

impl<T, C> Clone for ListRegistry<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, C> Default for ListRegistry<T, C> {
    fn default() -> Self {
        Self::with_config(SortableConfig::default())
    }
}

impl<T, C> fmt::Debug for ListRegistry<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("ListRegistry")
            .field("next_id", &state.next_id)
            .field("entries", &state.live.len())
            .field("config", &state.config)
            .finish()
    }
}

impl<T, C> ListRegistry<T, C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: SortableConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryState {
                next_id: 0,
                config,
                live: HashMap::new(),
            })),
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> SortableConfig {
        self.inner.borrow().config.clone()
    }

    /// Replace the configuration for every list on this registry.
    pub fn set_config(&self, config: SortableConfig) {
        self.inner.borrow_mut().config = config;
    }

    /// Whether `id` resolves to a live list.
    #[must_use]
    pub fn contains(&self, id: ListId) -> bool {
        self.inner
            .borrow()
            .live
            .get(&id)
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Number of live lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .borrow()
            .live
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of live lists in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<ListId> {
        let mut ids: Vec<ListId> = self
            .inner
            .borrow()
            .live
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn allocate_id(&self) -> ListId {
        let mut state = self.inner.borrow_mut();
        let id = ListId(state.next_id);
        state.next_id += 1;
        id
    }

    /// Record a freshly allocated id. Cannot collide.
    pub(crate) fn insert_fresh(&self, id: ListId, cell: Weak<ListCell<T, C>>) {
        self.inner.borrow_mut().live.insert(id, cell);
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "registry.register", list = %id);
    }
}

impl<T: Clone + 'static, C: 'static> ListRegistry<T, C> {
    /// (Re-)register a list under its own id.
    ///
    /// Idempotent for a list that is already registered under that id. Fails
    /// with [`SortableError::DuplicateRegistration`] if the list sits in the
    /// table under another id, and with [`SortableError::IdCollision`] if a
    /// different live list holds the id.
    pub fn register(&self, list: &SortableList<T, C>) -> Result<ListId> {
        let id = list.id();
        let mut state = self.inner.borrow_mut();

        let elsewhere = state.live.iter().find_map(|(other, weak)| {
            (*other != id && weak.upgrade().is_some_and(|cell| list.is_cell(&cell)))
                .then_some(*other)
        });
        if let Some(existing) = elsewhere {
            return Err(SortableError::DuplicateRegistration { list: id, existing });
        }

        match state.live.get(&id).and_then(Weak::upgrade) {
            Some(cell) if list.is_cell(&cell) => return Ok(id),
            Some(_) => return Err(SortableError::IdCollision(id)),
            None => {}
        }

        state.live.insert(id, list.downgrade());
        state.next_id = state.next_id.max(id.get() + 1);
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "registry.register", list = %id);
        Ok(id)
    }

    /// Look up a live list.
    ///
    /// A stale entry (list dropped without unregistering) is pruned and
    /// reported as [`SortableError::UnknownList`].
    pub fn resolve(&self, id: ListId) -> Result<SortableList<T, C>> {
        let upgraded = self.inner.borrow().live.get(&id).map(Weak::upgrade);
        match upgraded {
            Some(Some(cell)) => Ok(SortableList::from_cell(cell, self.clone())),
            Some(None) => {
                self.inner.borrow_mut().live.remove(&id);
                Err(SortableError::UnknownList(id))
            }
            None => Err(SortableError::UnknownList(id)),
        }
    }

    /// Remove `id` from the table. Returns whether an entry existed.
    pub fn unregister(&self, id: ListId) -> bool {
        let removed = self.inner.borrow_mut().live.remove(&id).is_some();
        #[cfg(feature = "tracing")]
        {
            if removed {
                tracing::debug!(message = "registry.unregister", list = %id);
            }
        }
        removed
    }
}
