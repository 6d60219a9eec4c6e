#![forbid(unsafe_code)]

//! `on_drop` probes.

use std::cell::RefCell;
use std::rc::Rc;

use sortsync_core::{DropEvent, MoveInstruction};

/// What a probe saw during one callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRecord<T> {
    pub instruction: MoveInstruction,
    /// `old_list[old_index]` at callback time.
    pub moved: Option<T>,
    /// Lengths of (old_list, new_list) at callback time.
    pub lens: (usize, usize),
}

/// Records every drop it is attached to.
#[derive(Debug)]
pub struct DropProbe<T> {
    records: Rc<RefCell<Vec<ProbeRecord<T>>>>,
}

impl<T> Clone for DropProbe<T> {
    fn clone(&self) -> Self {
        Self {
            records: Rc::clone(&self.records),
        }
    }
}

impl<T> Default for DropProbe<T> {
    fn default() -> Self {
        Self {
            records: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone + 'static> DropProbe<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback to pass to `ListOptions::on_drop` or `set_on_drop`.
    pub fn callback<C: 'static>(&self) -> impl Fn(&DropEvent<T, C>) + 'static {
        let records = Rc::clone(&self.records);
        move |event: &DropEvent<T, C>| {
            records.borrow_mut().push(ProbeRecord {
                instruction: event.instruction(),
                moved: event.moved_item(),
                lens: (event.old_list.len(), event.new_list.len()),
            });
        }
    }

    #[must_use]
    pub fn records(&self) -> Vec<ProbeRecord<T>> {
        self.records.borrow().clone()
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.records.borrow().len()
    }

    #[must_use]
    pub fn last(&self) -> Option<ProbeRecord<T>> {
        self.records.borrow().last().cloned()
    }
}
