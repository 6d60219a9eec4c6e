#![forbid(unsafe_code)]

//! Trello-style board.
//!
//! Three columns (Next, Doing, Done) share the `trello` group so cards move
//! freely between them. Every column announces drops it receives, reading the
//! card from the **old** list since the callback runs before the move lands.
//! Cards can also be added, edited and deleted; the board keeps each column's
//! order mirrored into a [`ListBind`].

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use sortsync_core::{
    DropEvent, DropOutcome, ListBind, ListId, ListLayout, ListOptions, ListRegistry, RawDrop,
    SortableConfig, SortableList,
};

use crate::error::Result;

pub const GROUP: &str = "trello";

/// Card descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub label: String,
}

impl Task {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Rendered card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub text: String,
}

impl From<&Task> for CardView {
    fn from(task: &Task) -> Self {
        Self {
            text: format!("[ {} ]", task.label),
        }
    }
}

pub type Column = SortableList<Task, CardView>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyKind {
    Info,
    Doing,
    Positive,
    Warning,
}

impl NotifyKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Doing => "doing",
            Self::Positive => "positive",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotifyKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub title: String,
    pub id: ListId,
    pub cards: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrelloReport {
    pub notifications: Vec<Notification>,
    pub columns: Vec<ColumnReport>,
    /// Host re-renders requested by the engine.
    pub refreshes: usize,
}

pub struct Board {
    pub next: Column,
    pub doing: Column,
    pub done: Column,
    binds: [ListBind<Task>; 3],
    notifications: Rc<RefCell<Vec<Notification>>>,
    refreshes: usize,
}

impl Board {
    /// The starting board.
    pub fn new(config: SortableConfig) -> Self {
        Self::with_cards(
            config,
            vec![Task::new("Simplify Layouting"), Task::new("Provide Deployment")],
            vec![Task::new("Improve Documentation")],
            vec![
                Task::new("Invent NiceGUI"),
                Task::new("Test in own Projects"),
                Task::new("Publish as Open Source"),
                Task::new("Release Native-Mode"),
            ],
        )
    }

    pub fn with_cards(
        config: SortableConfig,
        next: Vec<Task>,
        doing: Vec<Task>,
        done: Vec<Task>,
    ) -> Self {
        let registry = ListRegistry::with_config(config);
        let binds = [ListBind::new(next), ListBind::new(doing), ListBind::new(done)];
        let column = |bind: &ListBind<Task>| {
            SortableList::bound(
                &registry,
                bind,
                |task: &Task| CardView::from(task),
                ListOptions::new().group(GROUP).layout(ListLayout::column()),
            )
        };
        let (next, doing, done) = (column(&binds[0]), column(&binds[1]), column(&binds[2]));

        let notifications = Rc::new(RefCell::new(Vec::new()));
        let announce = announcer(
            Rc::clone(&notifications),
            [next.id(), doing.id(), done.id()],
        );
        next.set_on_drop(announce.clone());
        doing.set_on_drop(announce.clone());
        done.set_on_drop(announce);

        Self {
            next,
            doing,
            done,
            binds,
            notifications,
            refreshes: 0,
        }
    }

    /// Deliver a finished drag to the receiving column.
    pub fn drag(
        &mut self,
        from: &Column,
        old_index: usize,
        to: &Column,
        new_index: usize,
    ) -> DropOutcome {
        let outcome = to.handle_drop(RawDrop::new(from.id(), to.id(), old_index, new_index));
        self.refresh();
        outcome
    }

    /// Append a task to Next. Blank labels are ignored.
    pub fn add_task(&mut self, label: &str) -> Result<bool> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(false);
        }
        self.next.insert(-1, Task::new(label))?;
        self.refresh();
        Ok(true)
    }

    pub fn edit_card(&mut self, column: &Column, index: usize, label: &str) -> Result<Task> {
        let previous = column.replace_at(index, Task::new(label))?;
        self.refresh();
        Ok(previous)
    }

    pub fn delete_card(&mut self, column: &Column, index: usize) -> Result<Task> {
        let task = column.pop(index)?;
        self.notify(NotifyKind::Warning, format!("{} deleted!!", task.label));
        self.refresh();
        Ok(task)
    }

    /// Columns in display order.
    pub fn columns(&self) -> [(&'static str, &Column); 3] {
        [("Next", &self.next), ("Doing", &self.doing), ("Done", &self.done)]
    }

    pub fn report(&self) -> TrelloReport {
        let columns = self
            .columns()
            .iter()
            .zip(&self.binds)
            .map(|((title, column), bind)| ColumnReport {
                title: (*title).to_string(),
                id: column.id(),
                cards: bind.with_value(|tasks| tasks.iter().map(|t| t.label.clone()).collect()),
            })
            .collect();
        TrelloReport {
            notifications: self.notifications.borrow().clone(),
            columns,
            refreshes: self.refreshes,
        }
    }

    fn notify(&self, kind: NotifyKind, message: String) {
        self.notifications
            .borrow_mut()
            .push(Notification { kind, message });
    }

    fn refresh(&mut self) {
        let mut refreshed = 0;
        for (title, column) in self.columns() {
            if column.update() {
                tracing::debug!(message = "demo.refresh", column = title, list = %column.id());
                refreshed += 1;
            }
        }
        self.refreshes += refreshed;
    }
}

fn announcer(
    sink: Rc<RefCell<Vec<Notification>>>,
    [next, doing, done]: [ListId; 3],
) -> impl Fn(&DropEvent<Task, CardView>) + Clone + 'static {
    move |event: &DropEvent<Task, CardView>| {
        let Some(task) = event.moved_item() else {
            return;
        };
        let to = event.new_list.id();
        let (kind, message) = if to == next {
            (NotifyKind::Info, format!("Next up is `{}`", task.label))
        } else if to == doing {
            (NotifyKind::Doing, format!("Doing `{}`", task.label))
        } else if to == done {
            (NotifyKind::Positive, format!("`{}` is done!!", task.label))
        } else {
            return;
        };
        sink.borrow_mut().push(Notification { kind, message });
    }
}

/// Scripted walkthrough of the board.
pub fn play(config: SortableConfig) -> Result<TrelloReport> {
    let mut board = Board::new(config);
    let (next, doing, done) = (board.next.clone(), board.doing.clone(), board.done.clone());

    board.drag(&next, 0, &doing, 0);
    board.drag(&doing, 1, &done, 4);
    board.add_task("Port to Rust")?;
    board.edit_card(&next, 0, "Provide Deployment Docs")?;
    board.delete_card(&done, 0)?;
    board.drag(&doing, 0, &next, 0);
    board.drag(&done, 0, &done, 3);

    tracing::info!(
        message = "demo.trello.done",
        next = next.len(),
        doing = doing.len(),
        done = done.len()
    );
    Ok(board.report())
}

pub fn render_text(report: &TrelloReport) -> String {
    let mut out = String::new();
    for note in &report.notifications {
        let _ = writeln!(out, "[{}] {}", note.kind.as_str(), note.message);
    }
    out.push('\n');
    for column in &report.columns {
        let _ = writeln!(out, "{} ({}):", column.title, column.id);
        for card in &column.cards {
            let _ = writeln!(out, "  - {card}");
        }
    }
    let _ = writeln!(out, "\nrefreshes: {}", report.refreshes);
    out
}
