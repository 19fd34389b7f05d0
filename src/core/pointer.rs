//! Pointer events with DOM-style bubbling.
//!
//! A press is resolved to the topmost painted element (see
//! [`crate::ui::elements::ElementMap`]) and then handed to that element's
//! handler and each of its logical ancestors in turn.  Any handler may call
//! [`PointerEvent::stop_propagation`] to keep the event from reaching the
//! rest of the chain, including the document-level dismissal listener.

use ratatui::layout::{Position, Rect};

/// Identity of a painted, hit-testable element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// The whole terminal; root of every chain.
    Screen,
    /// The bordered pane the table lives in.  Acts as the scroll container.
    TablePane,
    /// A data row, by index into the dataset.
    TableRow(usize),
    /// The control's outer wrapper; the string is the caller's id, verbatim.
    Control(String),
    /// The button that opens and closes the panel.
    Trigger,
    /// The floating panel.
    Panel,
    /// One checkbox row in the panel, keyed by column name.
    PanelRow(String),
}

impl ElementId {
    /// Is this element part of the overlay's own subtree?
    pub fn is_overlay(&self) -> bool {
        matches!(self, ElementId::Panel | ElementId::PanelRow(_))
    }
}

/// One pointer press travelling through the element tree.
#[derive(Debug, Clone)]
pub struct PointerEvent {
    pub position: Position,
    /// The element the press landed on.
    pub target: ElementId,
    /// Root-first list of the target's ancestors, not including the target.
    pub ancestors: Vec<ElementId>,
    /// The element whose handler is currently running, and its rect.
    current: Option<(ElementId, Rect)>,
    propagation_stopped: bool,
}

impl PointerEvent {
    pub fn new(position: Position, target: ElementId, ancestors: Vec<ElementId>) -> Self {
        Self {
            position,
            target,
            ancestors,
            current: None,
            propagation_stopped: false,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Set by the dispatcher before each handler runs.
    pub fn set_current_target(&mut self, id: ElementId, rect: Rect) {
        self.current = Some((id, rect));
    }

    /// The element whose handler is running (DOM `currentTarget`).
    pub fn current_target(&self) -> Option<&(ElementId, Rect)> {
        self.current.as_ref()
    }

    /// Bubble order: the target first, then its ancestors innermost-first.
    pub fn bubble_path(&self) -> Vec<ElementId> {
        std::iter::once(self.target.clone())
            .chain(self.ancestors.iter().rev().cloned())
            .collect()
    }

    /// Did the press land inside `id` or any of its descendants?
    pub fn is_within(&self, id: &ElementId) -> bool {
        self.target == *id || self.ancestors.contains(id)
    }

    /// Did the press land inside the overlay subtree?
    pub fn is_within_overlay(&self) -> bool {
        self.target.is_overlay() || self.ancestors.iter().any(ElementId::is_overlay)
    }
}
