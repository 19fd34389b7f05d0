//! Column descriptors and the parent-owned visibility mapping.
//!
//! The column-visibility control never owns a [`VisibilityMap`].  It reads
//! the parent's map during render and sends [`VisibilityUpdate`] requests
//! back through a [`VisibilitySetter`].  The parent applies them on its own
//! schedule, so the control only sees a new value on the next frame.

use std::collections::HashMap;

use tokio::sync::mpsc;

/// One table column as the caller describes it.  List order is render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Unique identifier; also the row key inside the panel.
    pub name: String,
    /// Display text.
    pub label: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }

    /// Build a descriptor from a raw header, deriving a readable label
    /// (`"stage_name"` → `"Stage Name"`).
    pub fn from_header(header: &str) -> Self {
        Self::new(header, humanise(header))
    }
}

/// `"stage_name"` / `"stage-name"` → `"Stage Name"`.
fn humanise(header: &str) -> String {
    header
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ───────────────────────────────────────── map ───────────────

/// Column name → visible.  A missing entry reads as hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    entries: HashMap<String, bool>,
}

impl VisibilityMap {
    /// Every column visible except the ones named in `hidden`.
    pub fn all_visible_except(columns: &[ColumnDescriptor], hidden: &[String]) -> Self {
        let entries = columns
            .iter()
            .map(|c| (c.name.clone(), !hidden.contains(&c.name)))
            .collect();
        Self { entries }
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.entries.get(name).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Shallow merge: a copy of `self` with only `name` overwritten.
    pub fn with(&self, name: &str, visible: bool) -> Self {
        let mut next = self.clone();
        next.entries.insert(name.to_string(), visible);
        next
    }

    /// How many of `columns` are currently shown.
    pub fn visible_count(&self, columns: &[ColumnDescriptor]) -> usize {
        columns.iter().filter(|c| self.is_visible(&c.name)).count()
    }
}

#[cfg(test)]
impl VisibilityMap {
    /// Raw entry lookup; `None` means the parent never set this column.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries.get(name).copied()
    }
}

impl FromIterator<(String, bool)> for VisibilityMap {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ───────────────────────────────────────── bridge ────────────

/// A request to set one column's visibility.  Acts as a functional updater
/// over whatever map the parent holds when it gets around to applying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityUpdate {
    pub column: String,
    pub visible: bool,
}

impl VisibilityUpdate {
    pub fn apply(&self, prev: &VisibilityMap) -> VisibilityMap {
        prev.with(&self.column, self.visible)
    }
}

/// The parent's setter, handed to the control as a prop.
#[derive(Debug, Clone)]
pub struct VisibilitySetter {
    tx: mpsc::UnboundedSender<VisibilityUpdate>,
}

impl VisibilitySetter {
    /// Create a setter and the receiving end the parent drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<VisibilityUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Send an update request.  A closed channel means the parent is gone,
    /// which only happens during teardown; the request is dropped.
    pub fn request(&self, update: VisibilityUpdate) {
        if self.tx.send(update).is_err() {
            tracing::debug!("visibility update dropped: parent receiver closed");
        }
    }
}
