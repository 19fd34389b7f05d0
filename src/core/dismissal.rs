//! Click-away detection for the column panel.
//!
//! The watcher owns a document-level listener that exists only while the
//! panel is visible.  [`DismissalWatcher::sync`] is called once per frame
//! with the panel's visibility and installs or removes the listener to
//! match.  The listener is also released on drop, so a dismissal can never
//! fire after the owning control is gone.

/// Handle for an installed listener.  Ids are only used in logs.
#[derive(Debug, PartialEq, Eq)]
struct Listener {
    id: u64,
}

#[derive(Debug, Default)]
pub struct DismissalWatcher {
    listener: Option<Listener>,
    next_id: u64,
}

/// Where a press landed, relative to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressOrigin {
    /// Inside the panel or one of its rows.
    pub inside_overlay: bool,
    /// On the trigger that owns the panel.
    pub on_trigger: bool,
    /// An inner handler already stopped the event.
    pub propagation_stopped: bool,
}

impl DismissalWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or remove the listener so it matches `visible`.
    pub fn sync(&mut self, visible: bool) {
        match (visible, self.is_listening()) {
            (true, false) => {
                self.next_id = self.next_id.wrapping_add(1);
                tracing::debug!(listener = self.next_id, "click-away listener installed");
                self.listener = Some(Listener { id: self.next_id });
            }
            (false, true) => self.release(),
            _ => {}
        }
    }

    /// Remove the listener if one is installed.
    pub fn release(&mut self) {
        if let Some(listener) = self.listener.take() {
            tracing::debug!(listener = listener.id, "click-away listener removed");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Should this press dismiss the panel?  Never fires without an
    /// installed listener.
    pub fn observe(&self, press: PressOrigin) -> bool {
        self.is_listening()
            && !press.propagation_stopped
            && !press.inside_overlay
            && !press.on_trigger
    }
}

impl Drop for DismissalWatcher {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTSIDE: PressOrigin = PressOrigin {
        inside_overlay: false,
        on_trigger: false,
        propagation_stopped: false,
    };

    #[test]
    fn silent_until_installed() {
        let w = DismissalWatcher::new();
        assert!(!w.is_listening());
        assert!(!w.observe(OUTSIDE));
    }

    #[test]
    fn outside_press_fires_once_listening() {
        let mut w = DismissalWatcher::new();
        w.sync(true);
        assert!(w.is_listening());
        assert!(w.observe(OUTSIDE));
    }

    #[test]
    fn ignores_presses_inside_or_on_trigger_or_stopped() {
        let mut w = DismissalWatcher::new();
        w.sync(true);
        assert!(!w.observe(PressOrigin { inside_overlay: true, ..OUTSIDE }));
        assert!(!w.observe(PressOrigin { on_trigger: true, ..OUTSIDE }));
        assert!(!w.observe(PressOrigin { propagation_stopped: true, ..OUTSIDE }));
    }

    #[test]
    fn sync_removes_listener_when_hidden() {
        let mut w = DismissalWatcher::new();
        w.sync(true);
        w.sync(true);
        assert_eq!(w.listener, Some(Listener { id: 1 }));
        w.sync(false);
        assert!(!w.is_listening());
        assert!(!w.observe(OUTSIDE));

        // Reinstalling hands out a fresh listener.
        w.sync(true);
        assert_eq!(w.listener, Some(Listener { id: 2 }));
    }

    #[test]
    fn release_is_idempotent() {
        let mut w = DismissalWatcher::new();
        w.sync(true);
        w.release();
        w.release();
        assert!(!w.is_listening());
    }
}
