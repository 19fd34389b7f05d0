//! Per-frame registry of painted elements, used for hit-testing and for
//! resolving anchor references back to screen rects.
//!
//! Widgets register themselves while drawing.  Each element records its
//! *logical* parent, which need not be the element it is painted over: the
//! column panel paints on top of the table but is logically a child of the
//! control wrapper, so presses on it bubble through the control.

use ratatui::layout::{Position, Rect};

use crate::core::pointer::{ElementId, PointerEvent};

/// Layer for ordinary in-flow content.
pub const BASE_LAYER: u16 = 0;

#[derive(Debug, Clone)]
struct Element {
    id: ElementId,
    area: Rect,
    layer: u16,
    parent: Option<ElementId>,
}

#[derive(Debug, Default)]
pub struct ElementMap {
    elements: Vec<Element>,
}

impl ElementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget last frame's elements.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Record an element painted this frame.  Registering the same id twice
    /// replaces the earlier entry.
    pub fn register(&mut self, id: ElementId, area: Rect, layer: u16, parent: Option<ElementId>) {
        self.elements.retain(|e| e.id != id);
        self.elements.push(Element {
            id,
            area,
            layer,
            parent,
        });
    }

    pub fn rect(&self, id: &ElementId) -> Option<Rect> {
        self.elements.iter().find(|e| e.id == *id).map(|e| e.area)
    }

    /// Root-first ancestors of `id`.
    pub fn ancestors(&self, id: &ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut cursor = self.parent_of(id);
        while let Some(parent) = cursor {
            if chain.contains(&parent) || chain.len() > self.elements.len() {
                tracing::warn!(?parent, "cycle in element parents");
                break;
            }
            cursor = self.parent_of(&parent);
            chain.push(parent);
        }
        chain.reverse();
        chain
    }

    fn parent_of(&self, id: &ElementId) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|e| e.id == *id)
            .and_then(|e| e.parent.clone())
    }

    /// Build a press on `id` as if the user had clicked its top-left cell.
    /// Used to route keyboard activation through the normal bubbling path.
    pub fn synthetic_press(&self, id: &ElementId) -> Option<PointerEvent> {
        let area = self.rect(id)?;
        Some(PointerEvent::new(Position::new(area.x, area.y), id.clone(), self.ancestors(id)))
    }

    /// Resolve a press at `pos` to the topmost element under it.  Higher
    /// layers win; within a layer the element registered last wins.
    pub fn hit_test(&self, pos: Position) -> Option<PointerEvent> {
        let target = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.area.is_empty() && e.area.contains(pos))
            .max_by_key(|(i, e)| (e.layer, *i))
            .map(|(_, e)| e.id.clone())?;
        let ancestors = self.ancestors(&target);
        Some(PointerEvent::new(pos, target, ancestors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ElementMap {
        let mut m = ElementMap::new();
        m.register(ElementId::TablePane, Rect::new(0, 0, 40, 20), BASE_LAYER, None);
        m.register(ElementId::TableRow(0), Rect::new(1, 2, 38, 1), BASE_LAYER, Some(ElementId::TablePane));
        m.register(ElementId::TableRow(1), Rect::new(1, 3, 38, 1), BASE_LAYER, Some(ElementId::TablePane));
        m.register(
            ElementId::Control("cols".into()),
            Rect::new(28, 0, 11, 1),
            BASE_LAYER,
            Some(ElementId::TablePane),
        );
        m.register(
            ElementId::Trigger,
            Rect::new(28, 0, 11, 1),
            BASE_LAYER,
            Some(ElementId::Control("cols".into())),
        );
        m.register(ElementId::Panel, Rect::new(20, 1, 19, 5), 1350, Some(ElementId::Control("cols".into())));
        m.register(ElementId::PanelRow("a".into()), Rect::new(22, 2, 15, 1), 1350, Some(ElementId::Panel));
        m
    }

    #[test]
    fn overlay_wins_over_table_rows() {
        let m = sample();
        let ev = m.hit_test(Position::new(25, 2)).unwrap();
        assert_eq!(ev.target, ElementId::PanelRow("a".into()));
        assert_eq!(
            ev.ancestors,
            vec![ElementId::TablePane, ElementId::Control("cols".into()), ElementId::Panel]
        );

        // Just left of the panel the table row is hit.
        let ev = m.hit_test(Position::new(5, 2)).unwrap();
        assert_eq!(ev.target, ElementId::TableRow(0));
        assert_eq!(ev.ancestors, vec![ElementId::TablePane]);
    }

    #[test]
    fn later_registration_wins_within_a_layer() {
        let m = sample();
        let ev = m.hit_test(Position::new(30, 0)).unwrap();
        assert_eq!(ev.target, ElementId::Trigger);
    }

    #[test]
    fn synthetic_press_carries_ancestry() {
        let m = sample();
        let ev = m.synthetic_press(&ElementId::Trigger).unwrap();
        assert_eq!(ev.position, Position::new(28, 0));
        assert_eq!(ev.ancestors, vec![ElementId::TablePane, ElementId::Control("cols".into())]);
        assert!(m.synthetic_press(&ElementId::TableRow(9)).is_none());
    }

    #[test]
    fn miss_returns_none() {
        let m = sample();
        assert!(m.hit_test(Position::new(60, 30)).is_none());
    }

    #[test]
    fn reregistering_moves_the_rect() {
        let mut m = sample();
        m.register(ElementId::Trigger, Rect::new(10, 0, 5, 1), BASE_LAYER, None);
        assert_eq!(m.rect(&ElementId::Trigger), Some(Rect::new(10, 0, 5, 1)));
        m.clear();
        assert_eq!(m.rect(&ElementId::Trigger), None);
    }
}
