#![forbid(unsafe_code)]

//! Sortable list: item descriptors and their visual children, kept in step.
//!
//! A [`SortableList`] owns two sequences that are index-aligned at all times:
//! the item descriptors (`T`, the construction arguments of each child) and
//! the visual children (`C`) the host's factory built from them.
//!
//! # Invariants
//!
//! 1. `items.len() == children.len()` whenever a public operation returns.
//! 2. `children[i]` was built from (or moved together with) `items[i]`.
//! 3. A failed operation leaves both sequences untouched.
//! 4. Storage is never shared between lists; cross-list moves transfer a
//!    single item and its child.
//!
//! # Drop protocol
//!
//! [`handle_drop`](SortableList::handle_drop) resolves both endpoints through
//! the registry, runs the `on_drop` callback **before** reconciling (so the
//! moved item is still at `old_list[old_index]`), then applies an internal or
//! external move.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::bind::ListBind;
use crate::config::CrossGroupPolicy;
use crate::drop::{DropEvent, DropOutcome, RawDrop, resolve_drop};
use crate::error::{Result, SortableError};
use crate::id::ListId;
use crate::layout::ListLayout;
use crate::registry::ListRegistry;

/// Callback run for every drop a list receives, before reconciliation.
pub type DropCallback<T, C> = Rc<dyn Fn(&DropEvent<T, C>)>;

/// Builds the visual child for an item descriptor.
pub type ChildFactory<T, C> = Box<dyn FnMut(&T) -> C>;

/// Where [`SortableList::insert_at`] puts a new item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    Index(usize),
    End,
}

impl From<usize> for InsertAt {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<isize> for InsertAt {
    /// Negative indices append, like the host's append-to-tail convention.
    fn from(index: isize) -> Self {
        usize::try_from(index).map_or(Self::End, Self::Index)
    }
}

/// Construction options for a [`SortableList`].
pub struct ListOptions<T, C> {
    group: Option<String>,
    on_drop: Option<DropCallback<T, C>>,
    layout: ListLayout,
    disabled: bool,
}

impl<T, C> Default for ListOptions<T, C> {
    fn default() -> Self {
        Self {
            group: None,
            on_drop: None,
            layout: ListLayout::default(),
            disabled: false,
        }
    }
}

impl<T, C> ListOptions<T, C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists with equal groups may exchange items.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn layout(mut self, layout: ListLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl<T: 'static, C: 'static> ListOptions<T, C> {
    #[must_use]
    pub fn on_drop(mut self, callback: impl Fn(&DropEvent<T, C>) + 'static) -> Self {
        self.on_drop = Some(Rc::new(callback));
        self
    }
}

struct ListState<T, C> {
    items: Vec<T>,
    children: Vec<C>,
    group: Option<String>,
    layout: ListLayout,
    disabled: bool,
    on_drop: Option<DropCallback<T, C>>,
    needs_update: bool,
    bindings: Vec<ListBind<T>>,
}

// The factory lives outside `state` so it can run without a borrow on the
// sequences it is about to be inserted into. `publishing` is set while the
// list writes its order into its bindings, so their listeners can tell the
// list's own writes from external ones.
pub(crate) struct ListCell<T, C> {
    id: ListId,
    state: RefCell<ListState<T, C>>,
    factory: RefCell<ChildFactory<T, C>>,
    publishing: Cell<bool>,
}

/// Handle to a live sortable list.
///
/// Clones refer to the same list. Equality is identity.
pub struct SortableList<T, C> {
    cell: Rc<ListCell<T, C>>,
    registry: ListRegistry<T, C>,
}

impl<T, C> Clone for SortableList<T, C> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
            registry: self.registry.clone(),
        }
    }
}

impl<T, C> PartialEq for SortableList<T, C> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T, C> Eq for SortableList<T, C> {}

impl<T, C> fmt::Debug for SortableList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.cell.state.try_borrow().map(|s| s.items.len()).ok();
        f.debug_struct("SortableList")
            .field("id", &self.cell.id)
            .field("len", &len)
            .finish()
    }
}

impl<T, C> SortableList<T, C> {
    #[must_use]
    pub fn id(&self) -> ListId {
        self.cell.id
    }

    /// Registry this list was built on.
    #[must_use]
    pub fn registry(&self) -> &ListRegistry<T, C> {
        &self.registry
    }

    pub(crate) fn from_cell(cell: Rc<ListCell<T, C>>, registry: ListRegistry<T, C>) -> Self {
        Self { cell, registry }
    }

    pub(crate) fn is_cell(&self, cell: &Rc<ListCell<T, C>>) -> bool {
        Rc::ptr_eq(&self.cell, cell)
    }

    pub(crate) fn downgrade(&self) -> Weak<ListCell<T, C>> {
        Rc::downgrade(&self.cell)
    }
}

impl<T: Clone + 'static, C: 'static> SortableList<T, C> {
    /// Build a list, one child per initial item in order, and register it.
    pub fn new(
        registry: &ListRegistry<T, C>,
        items: Vec<T>,
        factory: impl FnMut(&T) -> C + 'static,
        options: ListOptions<T, C>,
    ) -> Self {
        let mut factory: ChildFactory<T, C> = Box::new(factory);
        let children = items.iter().map(|item| factory(item)).collect();
        let id = registry.allocate_id();
        let cell = Rc::new(ListCell {
            id,
            state: RefCell::new(ListState {
                items,
                children,
                group: options.group,
                layout: options.layout,
                disabled: options.disabled,
                on_drop: options.on_drop,
                needs_update: false,
                bindings: Vec::new(),
            }),
            factory: RefCell::new(factory),
            publishing: Cell::new(false),
        });
        registry.insert_fresh(id, Rc::downgrade(&cell));
        Self {
            cell,
            registry: registry.clone(),
        }
    }

    /// Build a list from the current contents of `bind` and keep the two
    /// in step from then on (see [`bind_value_to`](Self::bind_value_to)).
    pub fn bound(
        registry: &ListRegistry<T, C>,
        bind: &ListBind<T>,
        factory: impl FnMut(&T) -> C + 'static,
        options: ListOptions<T, C>,
    ) -> Self {
        let list = Self::new(registry, bind.value(), factory, options);
        list.attach(bind);
        list
    }

    // ── Reads ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.state().items.get(index).cloned()
    }

    /// Snapshot of the item order.
    #[must_use]
    pub fn value(&self) -> Vec<T> {
        self.state().items.clone()
    }

    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.state().items)
    }

    pub fn with_children<R>(&self, f: impl FnOnce(&[C]) -> R) -> R {
        f(&self.state().children)
    }

    /// Index of the first item matching `pred`.
    pub fn position(&self, pred: impl Fn(&T) -> bool) -> Option<usize> {
        self.state().items.iter().position(pred)
    }

    #[must_use]
    pub fn group(&self) -> Option<String> {
        self.state().group.clone()
    }

    /// Group tag, or the list's own id when it has none.
    ///
    /// An ungrouped list therefore only exchanges items with itself.
    #[must_use]
    pub fn effective_group(&self) -> String {
        self.state()
            .group
            .clone()
            .unwrap_or_else(|| self.id().to_string())
    }

    /// Whether items may be dropped here from `other`.
    #[must_use]
    pub fn accepts_from(&self, other: &Self) -> bool {
        self == other || self.effective_group() == other.effective_group()
    }

    #[must_use]
    pub fn layout(&self) -> ListLayout {
        self.state().layout
    }

    pub fn set_layout(&self, layout: ListLayout) {
        self.cell.state.borrow_mut().layout = layout;
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.state().disabled
    }

    /// Set dragging on or off; `None` toggles. Returns the new state.
    pub fn set_disabled(&self, disabled: Option<bool>) -> bool {
        let mut state = self.cell.state.borrow_mut();
        state.disabled = disabled.unwrap_or(!state.disabled);
        state.disabled
    }

    pub fn set_on_drop(&self, callback: impl Fn(&DropEvent<T, C>) + 'static) {
        self.cell.state.borrow_mut().on_drop = Some(Rc::new(callback));
    }

    pub fn clear_on_drop(&self) {
        self.cell.state.borrow_mut().on_drop = None;
    }

    /// Whether the host must re-render the container to show the logical
    /// order (set by `pop`, non-tail inserts and bulk replacement).
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.state().needs_update
    }

    /// Acknowledge a host refresh. Returns whether one was pending.
    pub fn update(&self) -> bool {
        std::mem::take(&mut self.cell.state.borrow_mut().needs_update)
    }

    /// Whether this list is what the registry resolves its id to.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registry
            .resolve(self.id())
            .is_ok_and(|resolved| resolved == *self)
    }

    /// Remove the list from its registry. Later drops naming it are discarded.
    pub fn dispose(&self) -> bool {
        self.is_registered() && self.registry.unregister(self.id())
    }

    pub fn check_invariants(&self) -> Result<()> {
        let state = self.state();
        if state.items.len() == state.children.len() {
            Ok(())
        } else {
            Err(SortableError::InvariantViolation {
                list: self.id(),
                items: state.items.len(),
                children: state.children.len(),
            })
        }
    }

    /// Keep `bind` and this list in step from now on.
    ///
    /// The list's order is pushed into `bind` immediately and after every
    /// mutation. Writes made directly to `bind` flow back through
    /// [`replace_all`](Self::replace_all), rebuilding every child.
    pub fn bind_value_to(&self, bind: &ListBind<T>) {
        if self.attach(bind) {
            self.publish(std::slice::from_ref(bind));
        }
    }

    // ── Mutation primitives ─────────────────────────────────────────────

    /// Insert at `index`; a negative index appends.
    pub fn insert(&self, index: isize, item: T) -> Result<()> {
        self.insert_at(InsertAt::from(index), item)
    }

    /// Append to the end.
    pub fn push(&self, item: T) -> Result<()> {
        self.insert_at(InsertAt::End, item)
    }

    pub fn insert_at(&self, at: InsertAt, item: T) -> Result<()> {
        // Validate before running the factory so a bad index builds nothing.
        insert_position(self.id(), at, self.state_mut()?.items.len())?;
        let child = self.build_child(&item)?;

        let _index = {
            let mut state = self.state_mut()?;
            let len = state.items.len();
            let index = insert_position(self.id(), at, len)?;
            state.items.insert(index, item);
            state.children.insert(index, child);
            if index != len {
                state.needs_update = true;
            }
            index
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sortable.insert", list = %self.id(), index = _index);
        self.after_mutation();
        Ok(())
    }

    /// Remove and return the item at `index`, dropping its child.
    pub fn pop(&self, index: usize) -> Result<T> {
        let (item, _child) = self.take(index)?;
        Ok(item)
    }

    /// Remove the first item matching `pred`.
    pub fn remove_where(&self, pred: impl Fn(&T) -> bool) -> Result<Option<T>> {
        match self.position(pred) {
            Some(index) => self.pop(index).map(Some),
            None => Ok(None),
        }
    }

    /// Swap the item at `index` for `item`, rebuilding its child. Returns the
    /// previous item.
    pub fn replace_at(&self, index: usize, item: T) -> Result<T> {
        let len = self.state_mut()?.items.len();
        if index >= len {
            return Err(SortableError::index(self.id(), index, len));
        }
        let child = self.build_child(&item)?;

        // The old child drops after the borrow ends so its `Drop` may read
        // this list.
        let (previous, _old_child) = {
            let mut state = self.state_mut()?;
            let len = state.items.len();
            if index >= len {
                return Err(SortableError::index(self.id(), index, len));
            }
            state.needs_update = true;
            (
                std::mem::replace(&mut state.items[index], item),
                std::mem::replace(&mut state.children[index], child),
            )
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sortable.replace", list = %self.id(), index);
        self.after_mutation();
        Ok(previous)
    }

    /// Replace every item, rebuilding all children through the factory.
    pub fn replace_all(&self, items: Vec<T>) -> Result<()> {
        let children = {
            let mut factory = self.factory_mut()?;
            items.iter().map(|item| (*factory)(item)).collect()
        };
        let _previous = {
            let mut state = self.state_mut()?;
            state.needs_update = true;
            (
                std::mem::replace(&mut state.items, items),
                std::mem::replace(&mut state.children, children),
            )
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sortable.replace_all", list = %self.id(), len = self.len());
        self.after_mutation();
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.replace_all(Vec::new())
    }

    /// Move one item within this list. `old_index == new_index` is a no-op.
    pub fn internal_move(&self, old_index: usize, new_index: usize) -> Result<()> {
        {
            let mut state = self.state_mut()?;
            let len = state.items.len();
            if old_index >= len {
                return Err(SortableError::index(self.id(), old_index, len));
            }
            if new_index >= len {
                return Err(SortableError::index(self.id(), new_index, len));
            }
            if old_index == new_index {
                return Ok(());
            }
            let item = state.items.remove(old_index);
            state.items.insert(new_index, item);
            let child = state.children.remove(old_index);
            state.children.insert(new_index, child);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sortable.move", list = %self.id(), old_index, new_index);
        self.after_mutation();
        Ok(())
    }

    /// Move `source[source_index]` to `self[dest_index]`, child included.
    ///
    /// Both lists change in one step: no observer sees the item in neither
    /// or both lists.
    pub fn external_move(
        &self,
        source: &Self,
        source_index: usize,
        dest_index: usize,
    ) -> Result<()> {
        if source == self {
            return self.internal_move(source_index, dest_index);
        }

        {
            let mut src = source.state_mut()?;
            let mut dst = self.state_mut()?;
            if source_index >= src.items.len() {
                return Err(SortableError::index(
                    source.id(),
                    source_index,
                    src.items.len(),
                ));
            }
            if dest_index > dst.items.len() {
                return Err(SortableError::index(self.id(), dest_index, dst.items.len()));
            }
            let item = src.items.remove(source_index);
            let child = src.children.remove(source_index);
            dst.items.insert(dest_index, item);
            dst.children.insert(dest_index, child);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "sortable.move",
            from = %source.id(),
            to = %self.id(),
            old_index = source_index,
            new_index = dest_index
        );
        source.after_mutation();
        self.after_mutation();
        Ok(())
    }

    // ── Drop protocol ───────────────────────────────────────────────────

    /// Entry point for the host's drag-completion notification.
    ///
    /// Never fails: stale ids, bad indices and rejected groups come back as
    /// [`DropOutcome::Discarded`] and are logged, since the gesture already
    /// completed on the client and there is nothing left to reconcile.
    pub fn handle_drop(&self, raw: RawDrop) -> DropOutcome {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "sortable.handle_drop",
            list = %self.id(),
            old_list = %raw.old_list,
            new_list = %raw.new_list,
            old_index = raw.old_index,
            new_index = raw.new_index
        )
        .entered();

        let event = match resolve_drop(&self.registry, raw) {
            Ok(event) => event,
            Err(err) => return self.discard(err),
        };
        let instruction = event.instruction();
        let internal = event.is_internal();

        if !internal && !event.new_list.accepts_from(&event.old_list) {
            match self.registry.config().cross_group {
                CrossGroupPolicy::Allow => {}
                CrossGroupPolicy::Warn => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        message = "sortable.drop.cross_group",
                        from = %instruction.source,
                        to = %instruction.dest
                    );
                }
                CrossGroupPolicy::Reject => {
                    return self.discard(SortableError::GroupMismatch {
                        from: instruction.source,
                        from_group: event.old_list.effective_group(),
                        to: instruction.dest,
                        to_group: event.new_list.effective_group(),
                    });
                }
            }
        }

        let callback = self.state().on_drop.clone();
        if let Some(callback) = callback {
            callback(&event);
        }

        if self.id() != instruction.source && self.id() != instruction.dest {
            return DropOutcome::NotInvolved(instruction);
        }

        let result = if internal {
            event
                .old_list
                .internal_move(event.old_index, event.new_index)
                .map(|()| {
                    if event.old_index == event.new_index {
                        DropOutcome::Unchanged(instruction)
                    } else {
                        DropOutcome::Internal(instruction)
                    }
                })
        } else {
            event
                .new_list
                .external_move(&event.old_list, event.old_index, event.new_index)
                .map(|()| DropOutcome::External(instruction))
        };

        match result {
            Ok(outcome) => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    message = "sortable.drop",
                    from = %instruction.source,
                    to = %instruction.dest,
                    old_index = instruction.source_index,
                    new_index = instruction.dest_index
                );
                outcome
            }
            Err(err) => self.discard(err),
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn state(&self) -> Ref<'_, ListState<T, C>> {
        self.cell.state.borrow()
    }

    fn state_mut(&self) -> Result<RefMut<'_, ListState<T, C>>> {
        self.cell
            .state
            .try_borrow_mut()
            .map_err(|_| SortableError::Busy(self.id()))
    }

    fn factory_mut(&self) -> Result<RefMut<'_, ChildFactory<T, C>>> {
        self.cell
            .factory
            .try_borrow_mut()
            .map_err(|_| SortableError::Busy(self.id()))
    }

    fn build_child(&self, item: &T) -> Result<C> {
        let mut factory = self.factory_mut()?;
        Ok((*factory)(item))
    }

    fn take(&self, index: usize) -> Result<(T, C)> {
        let taken = {
            let mut state = self.state_mut()?;
            let len = state.items.len();
            if index >= len {
                return Err(SortableError::index(self.id(), index, len));
            }
            let item = state.items.remove(index);
            let child = state.children.remove(index);
            state.needs_update = true;
            (item, child)
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sortable.pop", list = %self.id(), index);
        self.after_mutation();
        Ok(taken)
    }

    fn after_mutation(&self) {
        if self.registry.config().strict_invariants {
            let checked = self.check_invariants();
            #[cfg(feature = "tracing")]
            {
                if let Err(violation) = &checked {
                    tracing::error!(message = "sortable.invariant", list = %self.id(), error = %violation);
                }
            }
            debug_assert!(checked.is_ok(), "{checked:?}");
        }

        let bindings = self.state().bindings.clone();
        self.publish(&bindings);
    }

    /// Register `bind` and route its external writes into this list.
    /// Returns `false` if it was already attached.
    fn attach(&self, bind: &ListBind<T>) -> bool {
        {
            let mut state = self.cell.state.borrow_mut();
            if state.bindings.iter().any(|b| b.ptr_eq(bind)) {
                return false;
            }
            state.bindings.push(bind.clone());
        }

        let cell = Rc::downgrade(&self.cell);
        let registry = self.registry.clone();
        bind.subscribe(move |value: &[T]| {
            let Some(cell) = cell.upgrade() else {
                return;
            };
            if cell.publishing.get() {
                return;
            }
            let list = SortableList::from_cell(cell, registry.clone());
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "sortable.bind.write", list = %list.id(), len = value.len());
            if let Err(_err) = list.replace_all(value.to_vec()) {
                #[cfg(feature = "tracing")]
                tracing::warn!(message = "sortable.bind.write_failed", list = %list.id(), error = %_err);
            }
        });
        true
    }

    fn publish(&self, bindings: &[ListBind<T>]) {
        if bindings.is_empty() {
            return;
        }
        let snapshot = self.value();
        let was_publishing = self.cell.publishing.replace(true);
        for bind in bindings {
            bind.replace(snapshot.clone());
        }
        self.cell.publishing.set(was_publishing);
    }

    fn discard(&self, err: SortableError) -> DropOutcome {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            message = "sortable.drop.discarded",
            list = %self.id(),
            error_type = err.error_type(),
            error = %err
        );
        DropOutcome::Discarded(err)
    }
}

fn insert_position(list: ListId, at: InsertAt, len: usize) -> Result<usize> {
    match at {
        InsertAt::End => Ok(len),
        InsertAt::Index(index) if index <= len => Ok(index),
        InsertAt::Index(index) => Err(SortableError::index(list, index, len)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortableConfig;

    /// Child that remembers the item it was built from plus a build serial.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Card {
        label: String,
        serial: u32,
    }

    type Cards = SortableList<String, Card>;

    fn factory() -> impl FnMut(&String) -> Card + 'static {
        let mut serial = 0;
        move |label: &String| {
            serial += 1;
            Card {
                label: label.clone(),
                serial,
            }
        }
    }

    fn labels(range: std::ops::Range<u32>) -> Vec<String> {
        range.map(|i| i.to_string()).collect()
    }

    fn cards(registry: &ListRegistry<String, Card>, items: Vec<String>) -> Cards {
        SortableList::new(registry, items, factory(), ListOptions::new().group("a"))
    }

    fn child_labels(list: &Cards) -> Vec<String> {
        list.with_children(|children| children.iter().map(|c| c.label.clone()).collect())
    }

    fn assert_aligned(list: &Cards) {
        list.check_invariants().unwrap();
        assert_eq!(list.value(), child_labels(list));
    }

    #[test]
    fn construct_builds_one_child_per_item_in_order() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..3));
        assert_eq!(list.len(), 3);
        assert_aligned(&list);
        let serials: Vec<u32> = list.with_children(|c| c.iter().map(|c| c.serial).collect());
        assert_eq!(serials, vec![1, 2, 3]);
    }

    #[test]
    fn insert_negative_index_appends() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..2));
        list.insert(-1, "tail".into()).unwrap();
        list.insert(0, "head".into()).unwrap();
        assert_eq!(list.value(), vec!["head", "0", "1", "tail"]);
        assert_aligned(&list);
    }

    #[test]
    fn insert_past_end_fails_without_building_a_child() {
        let registry = ListRegistry::new();
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let list = SortableList::new(
            &registry,
            labels(0..2),
            move |label: &String| {
                counter.set(counter.get() + 1);
                label.clone()
            },
            ListOptions::new(),
        );
        assert_eq!(built.get(), 2);
        let err = list.insert(7, "x".into()).unwrap_err();
        assert_eq!(err, SortableError::index(list.id(), 7, 2));
        assert_eq!(built.get(), 2);
        assert_eq!(list.value(), labels(0..2));
    }

    #[test]
    fn pop_returns_item_then_fails_when_empty() {
        let registry = ListRegistry::new();
        let list = cards(&registry, vec!["x".into()]);
        assert_eq!(list.pop(0).unwrap(), "x");
        assert!(list.is_empty());
        assert_aligned(&list);
        assert_eq!(
            list.pop(0),
            Err(SortableError::index(list.id(), 0, 0))
        );
    }

    #[test]
    fn internal_move_reorders_items_and_children_together() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..4));
        list.internal_move(0, 2).unwrap();
        assert_eq!(list.value(), vec!["1", "2", "0", "3"]);
        assert_aligned(&list);
        list.internal_move(3, 0).unwrap();
        assert_eq!(list.value(), vec!["3", "1", "2", "0"]);
        assert_aligned(&list);
    }

    #[test]
    fn internal_move_identity_is_noop() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..3));
        let before = list.with_children(<[Card]>::to_vec);
        list.internal_move(1, 1).unwrap();
        assert_eq!(list.with_children(<[Card]>::to_vec), before);
        assert!(list.internal_move(3, 3).is_err());
    }

    #[test]
    fn internal_move_rejects_new_index_at_len() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..3));
        assert_eq!(
            list.internal_move(0, 3),
            Err(SortableError::index(list.id(), 3, 3))
        );
        assert_eq!(list.value(), labels(0..3));
    }

    #[test]
    fn external_move_transfers_the_child_itself() {
        let registry = ListRegistry::new();
        let a = cards(&registry, labels(0..3));
        let b = cards(&registry, Vec::new());
        let moved = a.with_children(|c| c[1].clone());

        b.external_move(&a, 1, 0).unwrap();

        assert_eq!(a.value(), vec!["0", "2"]);
        assert_eq!(b.value(), vec!["1"]);
        assert_eq!(b.with_children(|c| c[0].clone()), moved);
        assert_aligned(&a);
        assert_aligned(&b);
    }

    #[test]
    fn external_move_out_of_range_changes_nothing() {
        let registry = ListRegistry::new();
        let a = cards(&registry, labels(0..2));
        let b = cards(&registry, labels(10..11));
        assert!(b.external_move(&a, 2, 0).is_err());
        assert!(b.external_move(&a, 0, 2).is_err());
        assert_eq!(a.value(), labels(0..2));
        assert_eq!(b.value(), labels(10..11));
    }

    #[test]
    fn external_move_onto_itself_is_internal() {
        let registry = ListRegistry::new();
        let a = cards(&registry, labels(0..3));
        a.external_move(&a.clone(), 0, 2).unwrap();
        assert_eq!(a.value(), vec!["1", "2", "0"]);
    }

    #[test]
    fn replace_at_rebuilds_only_that_child() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..3));
        let previous = list.replace_at(1, "edited".into()).unwrap();
        assert_eq!(previous, "1");
        assert_eq!(list.value(), vec!["0", "edited", "2"]);
        assert_eq!(list.with_children(|c| c[1].serial), 4);
        assert_aligned(&list);
        assert!(list.replace_at(3, "nope".into()).is_err());
    }

    #[test]
    fn remove_where_deletes_by_value() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..3));
        assert_eq!(list.remove_where(|l| l == "1").unwrap(), Some("1".into()));
        assert_eq!(list.remove_where(|l| l == "1").unwrap(), None);
        assert_eq!(list.value(), vec!["0", "2"]);
        assert_aligned(&list);
    }

    #[test]
    fn replace_all_and_clear_rebuild_children() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..3));
        list.replace_all(labels(5..7)).unwrap();
        assert_eq!(list.value(), labels(5..7));
        assert_aligned(&list);
        list.clear().unwrap();
        assert!(list.is_empty());
        assert_aligned(&list);
    }

    #[test]
    fn update_flag_tracks_pending_refresh() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..2));
        assert!(!list.needs_update());
        list.push("tail".into()).unwrap();
        assert!(!list.needs_update(), "appending needs no refresh");
        list.insert(0, "head".into()).unwrap();
        assert!(list.needs_update());
        assert!(list.update());
        assert!(!list.update());
        list.pop(0).unwrap();
        assert!(list.needs_update());
    }

    #[test]
    fn disabled_toggles() {
        let registry = ListRegistry::new();
        let list = cards(&registry, Vec::new());
        assert!(!list.is_disabled());
        assert!(list.set_disabled(None));
        assert!(!list.set_disabled(None));
        assert!(list.set_disabled(Some(true)));
        assert!(list.set_disabled(Some(true)));
    }

    #[test]
    fn ungrouped_lists_only_accept_themselves() {
        let registry = ListRegistry::<String, Card>::new();
        let lone = SortableList::new(&registry, Vec::new(), factory(), ListOptions::new());
        let other = SortableList::new(&registry, Vec::new(), factory(), ListOptions::new());
        let grouped = cards(&registry, Vec::new());
        let peer = cards(&registry, Vec::new());
        assert_eq!(lone.effective_group(), lone.id().to_string());
        assert!(lone.accepts_from(&lone));
        assert!(!lone.accepts_from(&other));
        assert!(!grouped.accepts_from(&lone));
        assert!(grouped.accepts_from(&peer));
    }

    #[test]
    fn bound_list_mirrors_into_bind() {
        let registry = ListRegistry::new();
        let bind = ListBind::new(labels(0..3));
        let list = SortableList::bound(&registry, &bind, factory(), ListOptions::new());
        list.internal_move(0, 2).unwrap();
        assert_eq!(bind.value(), vec!["1", "2", "0"]);
        list.pop(0).unwrap();
        assert_eq!(bind.value(), vec!["2", "0"]);
    }

    #[test]
    fn writes_to_a_bound_bind_reach_the_list() {
        let registry = ListRegistry::new();
        let bind = ListBind::new(labels(0..2));
        let list = SortableList::bound(&registry, &bind, factory(), ListOptions::new());

        bind.append("2".into());
        assert_eq!(list.value(), bind.value());
        assert_aligned(&list);
        assert!(list.needs_update());

        list.internal_move(0, 2).unwrap();
        assert_eq!(bind.value(), vec!["1", "2", "0"]);
        assert_eq!(list.value(), bind.value());

        bind.clear();
        assert!(list.is_empty());
        assert_aligned(&list);
    }

    #[test]
    fn list_writes_notify_bind_listeners_once() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..3));
        let bind = ListBind::default();
        let calls = Rc::new(Cell::new(0usize));
        {
            let calls = Rc::clone(&calls);
            bind.subscribe(move |_| calls.set(calls.get() + 1));
        }
        list.bind_value_to(&bind);
        assert_eq!(calls.get(), 1);
        list.internal_move(0, 1).unwrap();
        assert_eq!(calls.get(), 2);
        let serials: Vec<u32> = list.with_children(|c| c.iter().map(|c| c.serial).collect());
        assert_eq!(serials, vec![2, 1, 3]);
    }

    #[test]
    fn two_lists_on_one_bind_converge() {
        let registry = ListRegistry::new();
        let bind = ListBind::new(labels(0..2));
        let first = SortableList::bound(&registry, &bind, factory(), ListOptions::new());
        let second = SortableList::bound(&registry, &bind, factory(), ListOptions::new());
        first.push("2".into()).unwrap();
        assert_eq!(second.value(), labels(0..3));
        assert_eq!(bind.value(), labels(0..3));
        assert_aligned(&second);
    }

    #[test]
    fn bind_outliving_its_list_stays_plain_data() {
        let registry = ListRegistry::new();
        let bind = ListBind::new(labels(0..1));
        drop(SortableList::bound(&registry, &bind, factory(), ListOptions::new()));
        bind.append("1".into());
        assert_eq!(bind.value(), labels(0..2));
    }

    /// Child that reads its parent list when dropped.
    struct Watcher {
        parent: Rc<RefCell<Option<SortableList<String, Watcher>>>>,
        seen: Rc<RefCell<Vec<usize>>>,
    }

    impl Drop for Watcher {
        fn drop(&mut self) {
            if let Some(list) = self.parent.borrow().as_ref() {
                self.seen.borrow_mut().push(list.len());
            }
        }
    }

    #[test]
    fn replaced_children_may_read_their_list_when_dropped() {
        let registry = ListRegistry::new();
        let parent = Rc::new(RefCell::new(None));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (parent_in, seen_in) = (Rc::clone(&parent), Rc::clone(&seen));
        let list = SortableList::new(
            &registry,
            labels(0..2),
            move |_: &String| Watcher {
                parent: Rc::clone(&parent_in),
                seen: Rc::clone(&seen_in),
            },
            ListOptions::new(),
        );
        *parent.borrow_mut() = Some(list.clone());

        assert_eq!(list.replace_at(0, "x".into()).unwrap(), "0");
        assert_eq!(*seen.borrow(), vec![2]);

        list.replace_all(labels(5..6)).unwrap();
        assert_eq!(*seen.borrow(), vec![2, 1, 1]);

        list.pop(0).unwrap();
        list.clear().unwrap();
        assert_eq!(*seen.borrow(), vec![2, 1, 1, 0]);
        assert_eq!(list.value(), Vec::<String>::new());

        let _unlinked = parent.borrow_mut().take();
    }

    #[test]
    fn strict_mode_checks_every_mutation() {
        let registry = ListRegistry::<String, Card>::with_config(
            SortableConfig::default().with_strict_invariants(true),
        );
        let a = cards(&registry, labels(0..3));
        let b = cards(&registry, Vec::new());
        a.insert(1, "x".into()).unwrap();
        b.external_move(&a, 0, 0).unwrap();
        a.replace_at(0, "y".into()).unwrap();
        a.pop(0).unwrap();
        assert_aligned(&a);
        assert_aligned(&b);
    }

    #[test]
    fn bind_value_to_pushes_current_order_immediately() {
        let registry = ListRegistry::new();
        let list = cards(&registry, labels(0..2));
        let bind = ListBind::default();
        list.bind_value_to(&bind);
        list.bind_value_to(&bind);
        assert_eq!(bind.value(), labels(0..2));
        let other = cards(&registry, Vec::new());
        other.external_move(&list, 0, 0).unwrap();
        assert_eq!(bind.value(), vec!["1"]);
    }

    #[test]
    fn factory_reentry_is_reported_as_busy() {
        let registry = ListRegistry::<String, String>::new();
        let slot: Rc<RefCell<Option<SortableList<String, String>>>> = Rc::new(RefCell::new(None));
        let seen = Rc::new(RefCell::new(None));
        let (slot_in, seen_in) = (Rc::clone(&slot), Rc::clone(&seen));
        let list = SortableList::new(
            &registry,
            Vec::new(),
            move |label: &String| {
                if let Some(list) = slot_in.borrow().as_ref() {
                    *seen_in.borrow_mut() = Some(list.push("nested".into()));
                }
                label.clone()
            },
            ListOptions::new(),
        );
        *slot.borrow_mut() = Some(list.clone());
        list.push("outer".into()).unwrap();
        assert_eq!(*seen.borrow(), Some(Err(SortableError::Busy(list.id()))));
        assert_eq!(list.value(), vec!["outer"]);
        slot.borrow_mut().take();
    }

    #[test]
    fn dispose_unregisters_once() {
        let registry = ListRegistry::new();
        let list = cards(&registry, Vec::new());
        assert!(list.is_registered());
        assert!(list.dispose());
        assert!(!list.dispose());
        assert!(!list.is_registered());
        assert_eq!(
            registry.resolve(list.id()),
            Err(SortableError::UnknownList(list.id()))
        );
    }

    #[test]
    fn insert_at_from_isize() {
        assert_eq!(InsertAt::from(-1isize), InsertAt::End);
        assert_eq!(InsertAt::from(-40isize), InsertAt::End);
        assert_eq!(InsertAt::from(3isize), InsertAt::Index(3));
        assert_eq!(InsertAt::from(3usize), InsertAt::Index(3));
    }
}
