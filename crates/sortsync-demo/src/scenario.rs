#![forbid(unsafe_code)]

//! JSON drop scenarios.
//!
//! A scenario declares named lists and a sequence of steps, and the replay
//! reports every step's outcome plus the final item order:
//!
//! ```json
//! {
//!   "lists": [
//!     {"name": "a", "group": "g", "items": [{"label": "0"}, {"label": "1"}]},
//!     {"name": "b", "group": "g", "items": []}
//!   ],
//!   "steps": [
//!     {"op": "drop", "from": "a", "to": "b", "old_index": 1, "new_index": 0},
//!     {"op": "pop", "list": "a", "index": 0}
//!   ]
//! }
//! ```
//!
//! Items must be JSON objects. Steps that fail inside the engine are
//! recorded and replay continues; malformed scenarios fail up front.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sortsync_core::{
    DropOutcome, ListId, ListLayout, ListOptions, ListRegistry, RawDrop, SortableConfig,
    SortableList,
};

use crate::error::{DemoError, Result};

/// Descriptor: a JSON object of child construction arguments.
pub type Descriptor = Value;

/// Rendered child: the descriptor's `label`, or its compact JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub text: String,
}

impl From<&Descriptor> for Tile {
    fn from(descriptor: &Descriptor) -> Self {
        let text = match descriptor.get("label") {
            Some(Value::String(label)) => label.clone(),
            _ => descriptor.to_string(),
        };
        Self { text }
    }
}

type List = SortableList<Descriptor, Tile>;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Overrides the host configuration when present.
    #[serde(default)]
    pub config: Option<SortableConfig>,
    pub lists: Vec<ListSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSpec {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub layout: ListLayout,
    #[serde(default)]
    pub items: Vec<Descriptor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// A drag finished on the client. `receiver` defaults to `to`.
    Drop {
        from: String,
        to: String,
        old_index: usize,
        new_index: usize,
        #[serde(default)]
        receiver: Option<String>,
    },
    Insert {
        list: String,
        index: isize,
        item: Descriptor,
    },
    Pop {
        list: String,
        index: usize,
    },
    /// Remove the list from the registry; later drops naming it are discarded.
    Dispose {
        list: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub op: &'static str,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListReport {
    pub name: String,
    pub id: ListId,
    pub group: String,
    pub classes: Vec<String>,
    pub items: Vec<Descriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub lists: Vec<ListReport>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashMap::new();
        for (position, list) in self.lists.iter().enumerate() {
            if seen.insert(list.name.as_str(), position).is_some() {
                return Err(DemoError::scenario(format!(
                    "list `{}` declared twice",
                    list.name
                )));
            }
            if let Some(index) = list.items.iter().position(|item| !item.is_object()) {
                return Err(DemoError::scenario(format!(
                    "list `{}` item {index} is not an object",
                    list.name
                )));
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            let names: Vec<&str> = match step {
                Step::Drop {
                    from, to, receiver, ..
                } => [Some(from), Some(to), receiver.as_ref()]
                    .into_iter()
                    .flatten()
                    .map(String::as_str)
                    .collect(),
                Step::Insert { list, item, .. } => {
                    if !item.is_object() {
                        return Err(DemoError::scenario(format!(
                            "step {index}: inserted item is not an object"
                        )));
                    }
                    vec![list.as_str()]
                }
                Step::Pop { list, .. } | Step::Dispose { list } => vec![list.as_str()],
            };
            if let Some(unknown) = names.iter().find(|name| !seen.contains_key(*name)) {
                return Err(DemoError::scenario(format!(
                    "step {index}: unknown list `{unknown}`"
                )));
            }
        }
        Ok(())
    }

    /// Build the lists and run every step.
    pub fn replay(&self, host_config: SortableConfig) -> ReplayReport {
        let config = self.config.clone().unwrap_or(host_config);
        let registry = ListRegistry::with_config(config);
        let lists: Vec<(String, List)> = self
            .lists
            .iter()
            .map(|spec| {
                let mut options = ListOptions::new().layout(spec.layout);
                if let Some(group) = &spec.group {
                    options = options.group(group.clone());
                }
                let list = SortableList::new(
                    &registry,
                    spec.items.clone(),
                    |descriptor: &Descriptor| Tile::from(descriptor),
                    options,
                );
                (spec.name.clone(), list)
            })
            .collect();
        let by_name: HashMap<&str, &List> =
            lists.iter().map(|(name, list)| (name.as_str(), list)).collect();

        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let (op, outcome) = run_step(&by_name, step);
            tracing::debug!(message = "demo.replay.step", step = index, op, outcome = %outcome);
            steps.push(StepReport {
                step: index,
                op,
                outcome,
            });
        }

        let lists = lists
            .iter()
            .map(|(name, list)| ListReport {
                name: name.clone(),
                id: list.id(),
                group: list.effective_group(),
                classes: list.layout().css_classes(),
                items: list.value(),
            })
            .collect();
        ReplayReport { steps, lists }
    }
}

// Names were checked by `validate`; a miss here only happens for scenarios
// built in code, and reads as an unknown list.
fn lookup<'a>(by_name: &HashMap<&str, &'a List>, name: &str) -> Option<&'a List> {
    by_name.get(name).copied()
}

fn run_step(by_name: &HashMap<&str, &List>, step: &Step) -> (&'static str, String) {
    match step {
        Step::Drop {
            from,
            to,
            old_index,
            new_index,
            receiver,
        } => {
            let receiver_name = receiver.as_ref().unwrap_or(to);
            let (Some(from), Some(to), Some(receiver)) = (
                lookup(by_name, from),
                lookup(by_name, to),
                lookup(by_name, receiver_name),
            ) else {
                return ("drop", "error: unknown list".into());
            };
            let outcome = receiver.handle_drop(RawDrop::new(from.id(), to.id(), *old_index, *new_index));
            ("drop", describe(&outcome))
        }
        Step::Insert { list, index, item } => {
            let Some(list) = lookup(by_name, list) else {
                return ("insert", "error: unknown list".into());
            };
            match list.insert(*index, item.clone()) {
                Ok(()) => ("insert", "ok".into()),
                Err(err) => ("insert", format!("error: {err}")),
            }
        }
        Step::Pop { list, index } => {
            let Some(list) = lookup(by_name, list) else {
                return ("pop", "error: unknown list".into());
            };
            match list.pop(*index) {
                Ok(item) => ("pop", format!("ok: {item}")),
                Err(err) => ("pop", format!("error: {err}")),
            }
        }
        Step::Dispose { list } => {
            let Some(list) = lookup(by_name, list) else {
                return ("dispose", "error: unknown list".into());
            };
            let disposed = list.dispose();
            ("dispose", if disposed { "ok" } else { "already disposed" }.into())
        }
    }
}

fn describe(outcome: &DropOutcome) -> String {
    match outcome {
        DropOutcome::Internal(_) => "internal".into(),
        DropOutcome::External(_) => "external".into(),
        DropOutcome::Unchanged(_) => "unchanged".into(),
        DropOutcome::NotInvolved(_) => "not involved".into(),
        DropOutcome::Discarded(err) => format!("discarded: {err}"),
    }
}
