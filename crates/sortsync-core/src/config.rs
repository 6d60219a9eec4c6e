#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! A [`SortableConfig`] lives on the [`ListRegistry`](crate::ListRegistry) and
//! is shared by every list built on it. Hosts either construct one with the
//! builder methods, deserialize it, or read it from the environment:
//!
//! | variable | values |
//! |---|---|
//! | `SORTSYNC_CROSS_GROUP` | `allow`, `warn`, `reject` |
//! | `SORTSYNC_STRICT_INVARIANTS` | `1`/`true`/`on`, `0`/`false`/`off` |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable selecting the [`CrossGroupPolicy`].
pub const ENV_CROSS_GROUP: &str = "SORTSYNC_CROSS_GROUP";
/// Environment variable toggling post-mutation invariant checks.
pub const ENV_STRICT_INVARIANTS: &str = "SORTSYNC_STRICT_INVARIANTS";

/// What to do with a drop whose endpoints belong to different groups.
///
/// The client only lets users drag between lists sharing a group, so a
/// cross-group drop normally means stale client state or a host bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossGroupPolicy {
    /// Apply the move silently.
    #[default]
    Allow,
    /// Apply the move and emit a warning.
    Warn,
    /// Discard the drop with [`SortableError::GroupMismatch`](crate::SortableError::GroupMismatch).
    Reject,
}

impl FromStr for CrossGroupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "warn" => Ok(Self::Warn),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown cross-group policy: {other}")),
        }
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortableConfig {
    /// Cross-group drop handling.
    pub cross_group: CrossGroupPolicy,
    /// Verify items/children alignment after every mutation. A violation is
    /// logged as `sortable.invariant` when the `tracing` feature is on, and
    /// panics in debug builds.
    pub strict_invariants: bool,
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            cross_group: CrossGroupPolicy::default(),
            strict_invariants: cfg!(debug_assertions),
        }
    }
}

impl SortableConfig {
    #[must_use]
    pub fn with_cross_group(mut self, policy: CrossGroupPolicy) -> Self {
        self.cross_group = policy;
        self
    }

    #[must_use]
    pub fn with_strict_invariants(mut self, strict: bool) -> Self {
        self.strict_invariants = strict;
        self
    }

    /// Defaults overridden by `SORTSYNC_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each known key.
    ///
    /// Unparseable values are ignored and the default is kept.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CROSS_GROUP) {
            match raw.parse() {
                Ok(policy) => config.cross_group = policy,
                Err(_reason) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(message = "config.ignored", key = ENV_CROSS_GROUP, reason = %_reason);
                }
            }
        }

        if let Some(raw) = lookup(ENV_STRICT_INVARIANTS) {
            match parse_flag(&raw) {
                Some(strict) => config.strict_invariants = strict,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(message = "config.ignored", key = ENV_STRICT_INVARIANTS, value = %raw);
                }
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults_allow_cross_group() {
        let config = SortableConfig::default();
        assert_eq!(config.cross_group, CrossGroupPolicy::Allow);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = SortableConfig::from_lookup(lookup(&[
            (ENV_CROSS_GROUP, "Reject"),
            (ENV_STRICT_INVARIANTS, "off"),
        ]));
        assert_eq!(config.cross_group, CrossGroupPolicy::Reject);
        assert!(!config.strict_invariants);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = SortableConfig::from_lookup(lookup(&[
            (ENV_CROSS_GROUP, "sometimes"),
            (ENV_STRICT_INVARIANTS, "maybe"),
        ]));
        assert_eq!(config, SortableConfig::default());
    }

    #[test]
    fn deserializes_partial_json() {
        let config: SortableConfig = serde_json::from_str(r#"{"cross_group":"warn"}"#).unwrap();
        assert_eq!(config.cross_group, CrossGroupPolicy::Warn);
        assert_eq!(
            config.strict_invariants,
            SortableConfig::default().strict_invariants
        );
    }
}
