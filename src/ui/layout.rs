//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout with the table pane and a bottom status bar.
pub struct AppLayout {
    pub table_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // table pane (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            table_area: chunks[0],
            status_area: chunks[1],
        }
    }

    /// Where the trigger sits: right end of the table pane's top border,
    /// leaving the corner and one border cell free.
    pub fn trigger_area(&self, width: u16) -> Rect {
        let pane = self.table_area;
        let width = width.min(pane.width.saturating_sub(4));
        let x = pane.right().saturating_sub(width + 2);
        Rect::new(x, pane.y, width, if pane.height > 0 { 1 } else { 0 })
    }
}
