//! Open/close state of the column panel and the anchor it hangs from.
//!
//! The anchor is stored as an element *reference* rather than a rect: its
//! on-screen position is looked up again every frame, so the panel follows
//! the trigger when the terminal is resized.
//!
//! Visibility is decided by `anchor.is_some()` alone.  The `open` flag is
//! flipped independently on every activation and only drives cosmetics (the
//! drop shadow), so a transient `open == false` with an anchor set is legal.

use super::pointer::{ElementId, PointerEvent};

/// Per-mount overlay state.  Never persisted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OverlayState {
    open: bool,
    anchor: Option<ElementId>,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger activation.  Stops the event so ancestor handlers (e.g. the
    /// table pane's background click) never see it.
    pub fn activate(&mut self, event: &mut PointerEvent) {
        event.stop_propagation();
        self.open = !self.open;

        if self.anchor.is_some() {
            self.anchor = None;
            tracing::debug!(open = self.open, "column panel closed by trigger");
            return;
        }

        let target = event
            .current_target()
            .map(|(id, _)| id.clone())
            .unwrap_or_else(|| event.target.clone());
        tracing::debug!(open = self.open, anchor = ?target, "column panel opened");
        self.anchor = Some(target);
    }

    /// Close unconditionally.  Idempotent.
    pub fn dismiss(&mut self) {
        if self.anchor.is_some() || self.open {
            tracing::debug!("column panel dismissed");
        }
        self.anchor = None;
        self.open = false;
    }

    pub fn is_visible(&self) -> bool {
        self.anchor.is_some()
    }

    /// Cosmetic flag; see the module docs.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn anchor(&self) -> Option<&ElementId> {
        self.anchor.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ratatui::layout::{Position, Rect};

    fn click_on(target: ElementId) -> PointerEvent {
        let mut ev = PointerEvent::new(Position::new(10, 0), target.clone(), vec![ElementId::TablePane]);
        ev.set_current_target(target, Rect::new(8, 0, 5, 1));
        ev
    }

    #[test]
    fn starts_closed() {
        let s = OverlayState::new();
        assert!(!s.is_visible());
        assert!(!s.is_open());
        assert_eq!(s.anchor(), None);
    }

    #[test]
    fn activate_twice_opens_then_closes() {
        let mut s = OverlayState::new();

        let mut first = click_on(ElementId::Trigger);
        s.activate(&mut first);
        assert_eq!(s.anchor(), Some(&ElementId::Trigger));
        assert!(s.is_visible());
        assert!(s.is_open());
        assert!(first.is_propagation_stopped());

        // Second activation closes regardless of its target.
        let mut second = click_on(ElementId::TableRow(3));
        s.activate(&mut second);
        assert_eq!(s.anchor(), None);
        assert!(!s.is_visible());
        assert!(!s.is_open());
        assert!(second.is_propagation_stopped());
    }

    #[test]
    fn visibility_follows_anchor_not_flag() {
        let mut s = OverlayState::new();
        s.activate(&mut click_on(ElementId::Trigger));
        // Force the two fields out of step the way a stray flag flip would.
        s.open = false;
        assert!(s.is_visible());
        assert!(!s.is_open());

        // Activating again still closes because an anchor is present.
        s.activate(&mut click_on(ElementId::Trigger));
        assert!(!s.is_visible());
        assert!(s.is_open());

        s.dismiss();
        assert_eq!(s, OverlayState::new());
    }

    #[test]
    fn dismiss_while_closed_is_a_no_op() {
        let mut s = OverlayState::new();
        s.dismiss();
        assert_eq!(s, OverlayState::new());
    }

    proptest! {
        #[test]
        fn dismiss_is_idempotent(opens in 0usize..4, repeats in 1usize..6) {
            let mut s = OverlayState::new();
            for _ in 0..opens {
                s.activate(&mut click_on(ElementId::Trigger));
            }
            s.dismiss();
            let once = s.clone();
            for _ in 0..repeats {
                s.dismiss();
            }
            prop_assert_eq!(&s, &once);
            prop_assert_eq!(s.anchor(), None);
            prop_assert!(!s.is_open());
        }
    }
}
