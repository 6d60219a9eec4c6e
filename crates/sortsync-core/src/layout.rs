#![forbid(unsafe_code)]

//! Container layout hints forwarded to the host renderer.
//!
//! The engine never lays anything out itself; it only remembers how the host
//! should arrange a list's children so that a re-render after `update()` uses
//! the same container shape.

use serde::{Deserialize, Serialize};

/// Cross-axis alignment of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Start,
    End,
    Center,
    Baseline,
    Stretch,
}

impl Align {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Center => "center",
            Self::Baseline => "baseline",
            Self::Stretch => "stretch",
        }
    }
}

/// Shape of a sortable container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListLayout {
    Row { wrap: bool, align: Option<Align> },
    Column { wrap: bool, align: Option<Align> },
    Grid { columns: u16 },
}

impl Default for ListLayout {
    fn default() -> Self {
        Self::column()
    }
}

impl ListLayout {
    /// Wrapping row.
    #[must_use]
    pub const fn row() -> Self {
        Self::Row {
            wrap: true,
            align: None,
        }
    }

    /// Non-wrapping column.
    #[must_use]
    pub const fn column() -> Self {
        Self::Column {
            wrap: false,
            align: None,
        }
    }

    /// Grid with `columns` equal tracks (at least one).
    #[must_use]
    pub const fn grid(columns: u16) -> Self {
        Self::Grid {
            columns: if columns == 0 { 1 } else { columns },
        }
    }

    #[must_use]
    pub fn with_align(self, align: Align) -> Self {
        match self {
            Self::Row { wrap, .. } => Self::Row {
                wrap,
                align: Some(align),
            },
            Self::Column { wrap, .. } => Self::Column {
                wrap,
                align: Some(align),
            },
            grid @ Self::Grid { .. } => grid,
        }
    }

    #[must_use]
    pub fn with_wrap(self, wrap: bool) -> Self {
        match self {
            Self::Row { align, .. } => Self::Row { wrap, align },
            Self::Column { align, .. } => Self::Column { wrap, align },
            grid @ Self::Grid { .. } => grid,
        }
    }

    /// CSS classes for the container element.
    #[must_use]
    pub fn css_classes(&self) -> Vec<String> {
        let mut classes = Vec::with_capacity(3);
        match self {
            Self::Row { align, .. } => {
                classes.push("nicegui-row".to_string());
                classes.push("row".to_string());
                if let Some(align) = align {
                    classes.push(format!("items-{}", align.as_str()));
                }
            }
            Self::Column { align, .. } => {
                classes.push("nicegui-column".to_string());
                if let Some(align) = align {
                    classes.push(format!("items-{}", align.as_str()));
                }
            }
            Self::Grid { .. } => classes.push("nicegui-grid".to_string()),
        }
        classes
    }

    /// Inline style override, if the layout departs from its class default.
    #[must_use]
    pub fn css_style(&self) -> Option<(&'static str, String)> {
        match *self {
            Self::Row { wrap: false, .. } => Some(("flex-wrap", "nowrap".to_string())),
            Self::Column { wrap: true, .. } => Some(("flex-wrap", "wrap".to_string())),
            Self::Grid { columns } => Some((
                "grid-template-columns",
                format!("repeat({columns}, minmax(0, 1fr))"),
            )),
            _ => None,
        }
    }
}
