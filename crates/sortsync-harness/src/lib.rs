#![forbid(unsafe_code)]

//! Test harness for sortsync.
//!
//! - [`recording`]: a child factory whose children remember what built them,
//!   plus alignment assertions.
//! - [`probe`]: `on_drop` callbacks that record what they observed.
//! - [`trace_capture`]: a `tracing` layer collecting event messages.
//! - [`snapshot`]: JSON snapshots and checksums of list state.

pub mod probe;
pub mod recording;
pub mod snapshot;
pub mod trace_capture;

pub use probe::{DropProbe, ProbeRecord};
pub use recording::{RecordedChild, Recorder, assert_aligned, labels, serials};
pub use snapshot::{lists_checksum, snapshot_lists};
pub use trace_capture::{CapturedEvent, TraceCapture};
