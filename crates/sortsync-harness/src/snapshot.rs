#![forbid(unsafe_code)]

//! JSON snapshots of list state.
//!
//! A snapshot maps each list's element id to its item order:
//!
//! ```text
//! {"s0":["a","c"],"s1":["b"]}
//! ```
//!
//! [`lists_checksum`] hashes the canonical (compact) encoding so scenario
//! runs can be compared without storing the full snapshot.

use serde::Serialize;
use serde_json::{Map, Value};
use sortsync_core::SortableList;

const CHECKSUM_PREFIX: &str = "blake3:";

/// Item order of every list, keyed by element id.
pub fn snapshot_lists<T, C>(lists: &[&SortableList<T, C>]) -> serde_json::Result<Value>
where
    T: Clone + Serialize + 'static,
    C: 'static,
{
    let mut map = Map::new();
    for list in lists {
        let items = list.with_items(|items| serde_json::to_value(items))?;
        map.insert(list.id().to_string(), items);
    }
    Ok(Value::Object(map))
}

/// `blake3:<hex>` over the compact encoding of [`snapshot_lists`].
pub fn lists_checksum<T, C>(lists: &[&SortableList<T, C>]) -> serde_json::Result<String>
where
    T: Clone + Serialize + 'static,
    C: 'static,
{
    let bytes = serde_json::to_vec(&snapshot_lists(lists)?)?;
    Ok(format!("{CHECKSUM_PREFIX}{}", blake3::hash(&bytes).to_hex()))
}
