#![forbid(unsafe_code)]

//! Bound value projection.
//!
//! A [`ListBind`] is an observable ordered collection other subsystems can
//! read and write at arm's length. On its own it is data only: mutating it
//! never touches visual children. Once a [`SortableList`](crate::SortableList)
//! is bound to it via
//! [`bind_value_to`](crate::SortableList::bind_value_to), the two stay in
//! step: the list pushes its order into the bind after every mutation, and a
//! direct write to the bind replaces the list's contents, rebuilding its
//! children.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Listener<T> = Rc<dyn Fn(&[T])>;

struct BindState<T> {
    value: Vec<T>,
    listeners: Vec<Listener<T>>,
}

/// Cloneable handle to a shared, observable `Vec<T>`.
pub struct ListBind<T> {
    inner: Rc<RefCell<BindState<T>>>,
}

impl<T> Clone for ListBind<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for ListBind<T> {
    fn default() -> Self {
        Self::from(Vec::new())
    }
}

impl<T> From<Vec<T>> for ListBind<T> {
    fn from(value: Vec<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BindState {
                value,
                listeners: Vec::new(),
            })),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ListBind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("ListBind")
            .field("value", &state.value)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl<T: Clone> ListBind<T> {
    #[must_use]
    pub fn new(value: Vec<T>) -> Self {
        Self::from(value)
    }

    /// Snapshot of the current contents.
    #[must_use]
    pub fn value(&self) -> Vec<T> {
        self.inner.borrow().value.clone()
    }

    /// Borrow the contents without cloning.
    pub fn with_value<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().value.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().value.is_empty()
    }

    /// Swap the whole collection.
    pub fn replace(&self, value: Vec<T>) {
        self.inner.borrow_mut().value = value;
        self.notify();
    }

    pub fn append(&self, element: T) {
        self.inner.borrow_mut().value.push(element);
        self.notify();
    }

    pub fn extend(&self, elements: impl IntoIterator<Item = T>) {
        self.inner.borrow_mut().value.extend(elements);
        self.notify();
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().value.clear();
        self.notify();
    }

    /// Call `listener` with the new contents after every change.
    pub fn subscribe(&self, listener: impl Fn(&[T]) + 'static) {
        self.inner.borrow_mut().listeners.push(Rc::new(listener));
    }

    /// Whether two handles share storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // Listeners run without a borrow held so they may read or write the bind.
    fn notify(&self) {
        let (listeners, snapshot) = {
            let state = self.inner.borrow();
            if state.listeners.is_empty() {
                return;
            }
            (state.listeners.clone(), state.value.clone())
        };
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
