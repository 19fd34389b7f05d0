//! Input handling — maps key/mouse events to state mutations.
//!
//! Mouse presses are hit-tested against the elements painted on the last
//! frame and bubbled from the target up through its ancestors, stopping as
//! soon as a handler calls `stop_propagation`.  The column control's
//! click-away listener sees every press after bubbling ends.  Keyboard
//! shortcuts that stand in for a click synthesise a press on the element and
//! go through the same path.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::Action;
use crate::core::columns::VisibilityUpdate;
use crate::core::pointer::{ElementId, PointerEvent};

use super::event::AppEvent;
use super::state::{ActiveView, AppState};

/// Handle one input event.  Update requests the parent has not applied yet
/// are applied first, so handlers never read a stale visibility map.
pub fn handle_event(state: &mut AppState, updates: &mut UnboundedReceiver<VisibilityUpdate>, event: AppEvent) {
    state.apply_pending(updates);
    match event {
        AppEvent::Key(k) => handle_key(state, k),
        AppEvent::Mouse(m) => handle_mouse(state, m),
        AppEvent::Resize | AppEvent::Tick => {}
    }
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Table => handle_table_key(state, key),
        ActiveView::Help => handle_help_key(state, key),
    }
}

fn handle_help_key(state: &mut AppState, key: KeyEvent) {
    match state.config.match_key(key) {
        Some(Action::Quit) => state.should_quit = true,
        Some(Action::Help | Action::Dismiss) => state.active_view = ActiveView::Table,
        _ => {}
    }
}

fn handle_table_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::Help => state.active_view = ActiveView::Help,
        Action::ToggleColumns => click(state, &ElementId::Trigger),
        Action::MoveUp if state.control.is_visible() => state.control.cursor_up(),
        Action::MoveDown if state.control.is_visible() => state.control.cursor_down(),
        Action::ToggleRow if state.control.is_visible() => {
            if let Some(row) = state.control.cursor_row() {
                click(state, &row);
            }
        }
        Action::Dismiss if state.control.is_visible() => state.control.dismiss(),
        Action::MoveUp => state.table_state.select_prev(state.dataset.rows.len()),
        Action::MoveDown => state.table_state.select_next(state.dataset.rows.len()),
        Action::Dismiss => state.table_state.selected = None,
        Action::ToggleRow => {}
    }
}

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let pos = Position::new(mouse.column, mouse.row);

    if state.active_view == ActiveView::Help {
        if matches!(mouse.kind, MouseEventKind::Down(_)) {
            state.active_view = ActiveView::Table;
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(event) = state.elements.hit_test(pos) {
                dispatch(state, event);
            }
        }
        MouseEventKind::Moved => {
            state.hovering_trigger = state
                .elements
                .hit_test(pos)
                .is_some_and(|ev| ev.target == ElementId::Trigger);
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
            let down = mouse.kind == MouseEventKind::ScrollDown;
            let over_panel = state
                .elements
                .hit_test(pos)
                .is_some_and(|ev| ev.is_within_overlay());
            match (over_panel, down) {
                (true, true) => state.control.cursor_down(),
                (true, false) => state.control.cursor_up(),
                (false, true) => state.table_state.select_next(state.dataset.rows.len()),
                (false, false) => state.table_state.select_prev(state.dataset.rows.len()),
            }
        }
        _ => {}
    }
}

/// Press `id` as if it had been clicked.  No-op if it was not painted.
fn click(state: &mut AppState, id: &ElementId) {
    if let Some(event) = state.elements.synthetic_press(id) {
        dispatch(state, event);
    }
}

/// Bubble a press through its target's ancestors, then let the click-away
/// listener observe it.
pub fn dispatch(state: &mut AppState, mut event: PointerEvent) {
    for id in event.bubble_path() {
        if event.is_propagation_stopped() {
            break;
        }
        let rect = state.elements.rect(&id).unwrap_or_default();
        event.set_current_target(id.clone(), rect);

        match id {
            ElementId::Trigger | ElementId::Panel | ElementId::PanelRow(_) | ElementId::Control(_) => {
                state.control.handle_pointer(&mut event, &state.visibility);
            }
            ElementId::TableRow(row) => state.table_state.selected = Some(row),
            // A press on bare pane background clears the row selection.
            ElementId::TablePane if event.target == ElementId::TablePane => {
                state.table_state.selected = None;
            }
            ElementId::TablePane | ElementId::Screen => {}
        }
    }

    state.control.observe_press(&event);
}
