#![forbid(unsafe_code)]

//! Recording child factory.
//!
//! Children built through a [`Recorder`] carry a copy of their descriptor and
//! a serial number unique across every list sharing the recorder. A moved
//! child keeps its serial; a rebuilt one gets a new serial. That lets tests
//! tell "relocated" from "destroyed and recreated".

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

use sortsync_core::SortableList;

/// Visual child stand-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedChild<T> {
    pub descriptor: T,
    pub serial: u64,
}

/// Shared serial counter and build log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    next_serial: Rc<Cell<u64>>,
    built: Rc<RefCell<Vec<u64>>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory for [`SortableList::new`].
    pub fn factory<T: Clone + 'static>(&self) -> impl FnMut(&T) -> RecordedChild<T> + 'static {
        let next_serial = Rc::clone(&self.next_serial);
        let built = Rc::clone(&self.built);
        move |descriptor: &T| {
            let serial = next_serial.get();
            next_serial.set(serial + 1);
            built.borrow_mut().push(serial);
            RecordedChild {
                descriptor: descriptor.clone(),
                serial,
            }
        }
    }

    /// Number of children built so far.
    #[must_use]
    pub fn build_count(&self) -> usize {
        self.built.borrow().len()
    }
}

/// Serials of a list's children, in order.
pub fn serials<T: Clone + 'static>(list: &SortableList<T, RecordedChild<T>>) -> Vec<u64> {
    list.with_children(|children| children.iter().map(|c| c.serial).collect())
}

/// Assert I1 and I2: equal lengths and `children[i]` built from `items[i]`.
#[track_caller]
pub fn assert_aligned<T>(list: &SortableList<T, RecordedChild<T>>)
where
    T: Clone + PartialEq + Debug + 'static,
{
    if let Err(err) = list.check_invariants() {
        panic!("{err}");
    }
    let items = list.value();
    let descriptors: Vec<T> =
        list.with_children(|children| children.iter().map(|c| c.descriptor.clone()).collect());
    assert_eq!(
        items,
        descriptors,
        "list {} items and children diverged",
        list.id()
    );
}

/// `["{start}", ..., "{end - 1}"]`.
#[must_use]
pub fn labels(range: std::ops::Range<u32>) -> Vec<String> {
    range.map(|i| i.to_string()).collect()
}
