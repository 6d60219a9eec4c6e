#![forbid(unsafe_code)]

//! List identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SortableError;

/// Identifier of a [`SortableList`](crate::SortableList), unique within the
/// [`ListRegistry`](crate::ListRegistry) that issued it.
///
/// Each registry runs its own monotonically increasing counter and never
/// reuses an id while it lives. Lists on different registries may share an
/// id; a host that wants process-wide uniqueness builds every list on one
/// registry. The display form `s{n}` matches the element id the host
/// renders for the list container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ListId(pub u64);

impl ListId {
    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl From<u64> for ListId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for ListId {
    type Err = SortableError;

    /// Accepts both `"s12"` and `"12"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('s').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| SortableError::InvalidListId(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ListId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(u64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(raw) => Ok(Self(raw)),
            Wire::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
