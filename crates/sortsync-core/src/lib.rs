#![forbid(unsafe_code)]

//! Core: multi-list drag-and-drop reorder synchronization.
//!
//! # Role in sortsync
//! `sortsync-core` keeps an application's ordered collections in lockstep with
//! the drag-and-drop rearrangements a user performs on their rendered form.
//! It owns the registry of live lists, the drop-notification protocol, and the
//! mutation primitives that keep a data ordering and a visual ordering aligned.
//!
//! # Primary responsibilities
//! - **ListRegistry**: non-owning id table used to resolve both endpoints of a
//!   drop by identity alone.
//! - **SortableList**: one entity owning both the item descriptors and the
//!   visual children built from them, index-aligned at all times.
//! - **Drop resolution**: raw host notifications become typed [`DropEvent`]s
//!   and are dispatched as internal or external moves.
//! - **ListBind**: the bound value projection other subsystems read and write
//!   at arm's length.
//!
//! # Threading
//! Every handle is built on `Rc`, so nothing here is `Send`. All operations run
//! to completion on the host's single dispatch thread; there is no locking.
//!
//! # Example
//!
//! ```
//! use sortsync_core::{ListOptions, ListRegistry, RawDrop, SortableList};
//!
//! let registry = ListRegistry::new();
//! let a = SortableList::new(
//!     &registry,
//!     vec!["0", "1", "2"],
//!     |label: &&str| label.to_string(),
//!     ListOptions::new().group("a"),
//! );
//! let b = SortableList::new(&registry, vec![], |label: &&str| label.to_string(), ListOptions::new().group("a"));
//!
//! let outcome = a.handle_drop(RawDrop::new(a.id(), b.id(), 1, 0));
//! assert!(outcome.is_applied());
//! assert_eq!(a.value(), vec!["0", "2"]);
//! assert_eq!(b.value(), vec!["1"]);
//! ```

pub mod bind;
pub mod config;
pub mod drop;
pub mod error;
pub mod id;
pub mod layout;
pub mod list;
pub mod registry;

pub use bind::ListBind;
pub use config::{CrossGroupPolicy, SortableConfig};
pub use drop::{DropEvent, DropOutcome, MoveInstruction, RawDrop, resolve_drop};
pub use error::{Result, SortableError};
pub use id::ListId;
pub use layout::{Align, ListLayout};
pub use list::{InsertAt, ListOptions, SortableList};
pub use registry::ListRegistry;
