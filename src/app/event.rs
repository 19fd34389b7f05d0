//! Terminal event abstraction.
//!
//! Wraps crossterm events into a smaller enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

impl AppEvent {
    /// Translate a crossterm event.  Key releases and mouse drags carry
    /// nothing the viewer reacts to and are dropped here.
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(k) if k.kind != KeyEventKind::Release => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) if !matches!(m.kind, MouseEventKind::Drag(_)) => Some(AppEvent::Mouse(m)),
            CtEvent::Resize(..) => Some(AppEvent::Resize),
            _ => None,
        }
    }
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        let next = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(ev) => AppEvent::from_crossterm(ev),
                Err(e) => {
                    tracing::warn!("terminal read failed: {e}");
                    None
                }
            },
            Ok(false) => Some(AppEvent::Tick),
            Err(e) => {
                tracing::warn!("terminal poll failed: {e}");
                break;
            }
        };
        if let Some(app_event) = next {
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton};

    fn mouse(kind: MouseEventKind) -> CtEvent {
        CtEvent::Mouse(MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn drops_key_releases_and_drags() {
        let mut release = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(AppEvent::from_crossterm(CtEvent::Key(release)).is_none());
        assert!(AppEvent::from_crossterm(mouse(MouseEventKind::Drag(MouseButton::Left))).is_none());
    }

    #[test]
    fn keeps_presses_clicks_and_resizes() {
        let press = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(matches!(AppEvent::from_crossterm(CtEvent::Key(press)), Some(AppEvent::Key(_))));
        assert!(matches!(
            AppEvent::from_crossterm(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(AppEvent::Mouse(_))
        ));
        assert!(matches!(AppEvent::from_crossterm(CtEvent::Resize(80, 24)), Some(AppEvent::Resize)));
        assert!(AppEvent::from_crossterm(CtEvent::FocusGained).is_none());
    }
}
