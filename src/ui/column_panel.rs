//! The floating checklist of columns.
//!
//! Pure rendering: the rows are derived from the caller's descriptors and
//! the parent's [`VisibilityMap`] every frame.  Nothing here remembers
//! which columns are checked.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, StatefulWidget, Widget},
};

use crate::core::columns::{ColumnDescriptor, VisibilityMap};

use super::theme::Theme;

/// Horizontal padding inside the border, in cells.
const PADDING_X: u16 = 1;
const CHECKBOX_WIDTH: u16 = 4; // "[x] "

// ───────────────────────────────────────── row model ─────────

/// One rendered checkbox row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow<'a> {
    /// Row key.
    pub name: &'a str,
    pub label: &'a str,
    pub checked: bool,
}

/// One row per column, in order; a column with no map entry is unchecked.
pub fn panel_rows<'a>(columns: &'a [ColumnDescriptor], visibility: &VisibilityMap) -> Vec<PanelRow<'a>> {
    columns
        .iter()
        .map(|c| PanelRow {
            name: &c.name,
            label: &c.label,
            checked: visibility.is_visible(&c.name),
        })
        .collect()
}

/// Size the panel would like before any clipping.
pub fn desired_size(columns: &[ColumnDescriptor]) -> (u16, u16) {
    let widest = columns
        .iter()
        .map(|c| u16::try_from(c.label.chars().count()).unwrap_or(u16::MAX))
        .max()
        .unwrap_or(0)
        .max(8);
    let width = widest
        .saturating_add(CHECKBOX_WIDTH)
        .saturating_add(2 * PADDING_X + 2);
    let rows = u16::try_from(columns.len()).unwrap_or(u16::MAX).max(1);
    (width, rows.saturating_add(2))
}

// ───────────────────────────────────────── state ─────────────

/// Keyboard cursor and scroll offset inside the panel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PanelState {
    pub cursor: usize,
    pub offset: usize,
}

impl PanelState {
    pub fn select_next(&mut self, max: usize) {
        if max > 0 && self.cursor < max - 1 {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Keep the cursor inside the viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        self.cursor = self.cursor.min(len - 1);
        if height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor - height + 1;
        }
        self.offset = self.offset.min(len.saturating_sub(height));
    }

    /// Row index drawn on screen line `line` of the inner area.
    pub fn row_at_line(&self, line: usize, len: usize) -> Option<usize> {
        let idx = self.offset + line;
        (idx < len).then_some(idx)
    }
}

/// Content area inside the panel's border and padding.
pub fn inner_area(area: Rect) -> Rect {
    let inner = panel_block(Style::default()).inner(area);
    Rect {
        x: inner.x.saturating_add(PADDING_X),
        width: inner.width.saturating_sub(2 * PADDING_X),
        ..inner
    }
}

/// Screen rect of every row currently scrolled into view, as
/// `(row index, rect)`.
pub fn row_areas(area: Rect, state: &PanelState, len: usize) -> Vec<(usize, Rect)> {
    let inner = inner_area(area);
    (0..inner.height)
        .filter_map(|line| {
            let idx = state.row_at_line(line as usize, len)?;
            Some((idx, Rect::new(inner.x, inner.y + line, inner.width, 1)))
        })
        .collect()
}

fn panel_block<'a>(style: Style) -> Block<'a> {
    Block::default()
        .title(" Columns ")
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::panel_border_style())
        .style(style)
}

// ───────────────────────────────────────── widget ────────────

pub struct ColumnPanel<'a> {
    rows: Vec<PanelRow<'a>>,
    style: Style,
    /// Draw a drop shadow (cosmetic "open" flag).
    shadow: bool,
}

impl<'a> ColumnPanel<'a> {
    pub fn new(rows: Vec<PanelRow<'a>>) -> Self {
        Self {
            rows,
            style: Theme::panel_style(),
            shadow: false,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn shadow(mut self, shadow: bool) -> Self {
        self.shadow = shadow;
        self
    }
}

impl<'a> StatefulWidget for ColumnPanel<'a> {
    type State = PanelState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }

        if self.shadow {
            let shadow = Rect::new(area.x.saturating_add(1), area.y.saturating_add(1), area.width, area.height)
                .intersection(buf.area);
            buf.set_style(shadow, Theme::shadow_style());
        }

        Clear.render(area, buf);
        let block = panel_block(self.style);
        block.render(area, buf);

        let inner = inner_area(area);
        state.clamp_scroll(inner.height as usize, self.rows.len());

        for (idx, row_area) in row_areas(area, state, self.rows.len()) {
            let row = &self.rows[idx];
            let (mark, mark_style) = if row.checked {
                ("[x] ", Theme::checked_style())
            } else {
                ("[ ] ", Theme::unchecked_style())
            };
            let label_style = if idx == state.cursor {
                self.style.patch(Theme::cursor_style())
            } else {
                self.style
            };
            let line = Line::from(vec![
                Span::styled(mark, self.style.patch(mark_style)),
                Span::styled(row.label, label_style),
            ]);
            buf.set_line(row_area.x, row_area.y, &line, row_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("a", "Alpha"),
            ColumnDescriptor::new("b", "Beta"),
        ]
    }

    fn map(pairs: &[(&str, bool)]) -> VisibilityMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn line_text(buf: &Buffer, area: Rect, y: u16) -> String {
        (area.x..area.right())
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn rows_follow_column_order_and_map() {
        let cols = columns();
        let rows = panel_rows(&cols, &map(&[("a", false), ("b", true)]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().map(|r| r.name).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rows.iter().map(|r| r.checked).collect::<Vec<_>>(), vec![false, true]);
    }

    #[test]
    fn missing_entry_renders_unchecked() {
        let cols = columns();
        let rows = panel_rows(&cols, &map(&[("b", true)]));
        assert!(!rows[0].checked);
        assert!(rows[1].checked);
    }

    #[test]
    fn renders_checkboxes_into_buffer() {
        let cols = columns();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        let mut state = PanelState::default();
        ColumnPanel::new(panel_rows(&cols, &map(&[("a", false), ("b", true)])))
            .render(area, &mut buf, &mut state);

        assert!(line_text(&buf, area, 0).contains("Columns"));
        assert!(line_text(&buf, area, 1).contains("[ ] Alpha"));
        assert!(line_text(&buf, area, 2).contains("[x] Beta"));
    }

    #[test]
    fn clipped_panel_scrolls_to_cursor() {
        let cols: Vec<_> = (0..6)
            .map(|i| ColumnDescriptor::new(format!("c{i}"), format!("Col {i}")))
            .collect();
        let area = Rect::new(0, 0, 20, 4); // two visible rows
        let mut buf = Buffer::empty(area);
        let mut state = PanelState { cursor: 4, offset: 0 };
        ColumnPanel::new(panel_rows(&cols, &VisibilityMap::default())).render(area, &mut buf, &mut state);

        assert_eq!(state.offset, 3);
        assert!(line_text(&buf, area, 2).contains("Col 4"));
        let rows = row_areas(area, &state, cols.len());
        assert_eq!(rows.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(rows[0].1, Rect::new(2, 1, 16, 1));
    }

    #[test]
    fn shadow_is_drawn_only_when_requested() {
        let cols = columns();
        let area = Rect::new(0, 0, 10, 3);
        let corner = (area.right(), area.y + 1);

        let mut buf = Buffer::empty(Rect::new(0, 0, 12, 5));
        ColumnPanel::new(panel_rows(&cols, &VisibilityMap::default()))
            .shadow(true)
            .render(area, &mut buf, &mut PanelState::default());
        assert_eq!(buf[corner].bg, Theme::shadow_style().bg.unwrap());

        let mut buf = Buffer::empty(Rect::new(0, 0, 12, 5));
        ColumnPanel::new(panel_rows(&cols, &VisibilityMap::default()))
            .render(area, &mut buf, &mut PanelState::default());
        assert_ne!(buf[corner].bg, Theme::shadow_style().bg.unwrap());
    }

    #[test]
    fn desired_size_fits_longest_label() {
        let (w, h) = desired_size(&[ColumnDescriptor::new("x", "A rather long label")]);
        assert_eq!(w, 19 + 4 + 4);
        assert_eq!(h, 3);
    }

    #[test]
    fn cursor_stays_in_range() {
        let mut s = PanelState::default();
        s.select_prev();
        assert_eq!(s.cursor, 0);
        s.select_next(2);
        s.select_next(2);
        assert_eq!(s.cursor, 1);
        s.clamp_scroll(5, 0);
        assert_eq!(s, PanelState::default());
    }
}
