#![forbid(unsafe_code)]

//! Group membership walkthrough.
//!
//! `sort1` and `sort2` share group `a`; `sort3` and `sort4` have no group and
//! so only accept their own items. The report lists the acceptance matrix and
//! the outcome of one same-group and one cross-group drop under the active
//! [`CrossGroupPolicy`](sortsync_core::CrossGroupPolicy).

use std::fmt::Write as _;

use serde::Serialize;
use sortsync_core::{
    Align, DropOutcome, ListId, ListLayout, ListOptions, ListRegistry, RawDrop, SortableConfig,
    SortableList,
};

type Labels = SortableList<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    pub name: &'static str,
    pub id: ListId,
    pub group: String,
    pub classes: Vec<String>,
    pub style: Option<String>,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropSummary {
    pub from: &'static str,
    pub to: &'static str,
    pub applied: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupsReport {
    pub lists: Vec<ListSummary>,
    /// `(to, from)` pairs of distinct lists where `to` accepts `from`.
    pub accepts: Vec<(&'static str, &'static str)>,
    pub drops: Vec<DropSummary>,
}

fn labels(range: std::ops::Range<u32>) -> Vec<String> {
    range.map(|i| i.to_string()).collect()
}

pub fn run(config: SortableConfig) -> GroupsReport {
    let registry = ListRegistry::with_config(config);
    let build = |items: Vec<String>, options: ListOptions<String, String>| -> Labels {
        SortableList::new(&registry, items, String::clone, options)
    };
    let lists: [(&'static str, Labels); 4] = [
        (
            "sort1",
            build(labels(0..3), ListOptions::new().group("a").layout(ListLayout::row())),
        ),
        (
            "sort2",
            build(labels(20..24), ListOptions::new().group("a").layout(ListLayout::column())),
        ),
        (
            "sort3",
            build(
                labels(30..34),
                ListOptions::new().layout(ListLayout::column().with_align(Align::Center)),
            ),
        ),
        (
            "sort4",
            build(labels(0..15), ListOptions::new().layout(ListLayout::grid(4))),
        ),
    ];

    let mut accepts = Vec::new();
    for (to_name, to) in &lists {
        for (from_name, from) in &lists {
            if to != from && to.accepts_from(from) {
                accepts.push((*to_name, *from_name));
            }
        }
    }

    let [(_, sort1), (_, sort2), (_, sort3), _] = &lists;
    let drops = vec![
        drop_between(("sort1", sort1), 0, ("sort2", sort2), 0),
        drop_between(("sort2", sort2), 0, ("sort3", sort3), 0),
    ];

    let lists = lists
        .iter()
        .map(|(name, list)| {
            let layout = list.layout();
            ListSummary {
                name: *name,
                id: list.id(),
                group: list.effective_group(),
                classes: layout.css_classes(),
                style: layout
                    .css_style()
                    .map(|(property, value)| format!("{property}: {value}")),
                items: list.value(),
            }
        })
        .collect();

    GroupsReport {
        lists,
        accepts,
        drops,
    }
}

fn drop_between(
    (from_name, from): (&'static str, &Labels),
    old_index: usize,
    (to_name, to): (&'static str, &Labels),
    new_index: usize,
) -> DropSummary {
    let outcome = to.handle_drop(RawDrop::new(from.id(), to.id(), old_index, new_index));
    let detail = match &outcome {
        DropOutcome::Discarded(err) => err.to_string(),
        other => format!("{other:?}"),
    };
    DropSummary {
        from: from_name,
        to: to_name,
        applied: outcome.is_applied(),
        detail,
    }
}

pub fn render_text(report: &GroupsReport) -> String {
    let mut out = String::new();
    for list in &report.lists {
        let _ = writeln!(
            out,
            "{} ({}) group={} classes={}{}",
            list.name,
            list.id,
            list.group,
            list.classes.join(" "),
            list.style
                .as_ref()
                .map(|s| format!(" style=\"{s}\""))
                .unwrap_or_default()
        );
        let _ = writeln!(out, "  {}", list.items.join(", "));
    }
    out.push('\n');
    for (to, from) in &report.accepts {
        let _ = writeln!(out, "{to} accepts from {from}");
    }
    out.push('\n');
    for drop in &report.drops {
        let verdict = if drop.applied { "applied" } else { "not applied" };
        let _ = writeln!(out, "{} -> {}: {verdict} ({})", drop.from, drop.to, drop.detail);
    }
    out
}
