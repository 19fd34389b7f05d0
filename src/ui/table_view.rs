//! Plain table renderer for the dataset behind the column control.
//!
//! Only columns the parent's [`VisibilityMap`] marks visible are drawn; a
//! column with no entry stays hidden, same as in the panel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::columns::{ColumnDescriptor, VisibilityMap};
use crate::core::dataset::Dataset;

use super::theme::Theme;

const MAX_COLUMN_WIDTH: usize = 24;
const COLUMN_GAP: usize = 2;

// ───────────────────────────────────────── state ─────────────

/// Row selection and scroll offset.
#[derive(Debug, Default)]
pub struct TableViewState {
    pub selected: Option<usize>,
    /// First data row drawn.
    pub offset: usize,
}

impl TableViewState {
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1).min(len - 1)));
    }

    /// Ensure the selected row is visible within `height` data rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        let Some(selected) = self.selected else {
            return;
        };
        if height == 0 {
            return;
        }
        if selected < self.offset {
            self.offset = selected;
        } else if selected >= self.offset + height {
            self.offset = selected - height + 1;
        }
    }
}

/// Screen rect of each data row in view, as `(row index, rect)`.  The
/// first inner line is the header.
pub fn row_areas(inner: Rect, state: &TableViewState, len: usize) -> Vec<(usize, Rect)> {
    (1..inner.height)
        .filter_map(|line| {
            let idx = state.offset + usize::from(line - 1);
            (idx < len).then(|| (idx, Rect::new(inner.x, inner.y + line, inner.width, 1)))
        })
        .collect()
}

/// Display width for a column: the wider of its label and its cells, capped.
fn column_width(dataset: &Dataset, col_idx: usize, column: &ColumnDescriptor) -> usize {
    dataset
        .rows
        .iter()
        .filter_map(|r| r.get(col_idx))
        .map(|c| c.chars().count())
        .chain(std::iter::once(column.label.chars().count()))
        .max()
        .unwrap_or(0)
        .min(MAX_COLUMN_WIDTH)
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text:<width$}")
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

// ───────────────────────────────────────── widget ────────────

pub struct TableView<'a> {
    dataset: &'a Dataset,
    visibility: &'a VisibilityMap,
    block: Option<Block<'a>>,
}

impl<'a> TableView<'a> {
    pub fn new(dataset: &'a Dataset, visibility: &'a VisibilityMap) -> Self {
        Self {
            dataset,
            visibility,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// `(index into dataset columns, width)` for each visible column.
    fn visible_columns(&self) -> Vec<(usize, usize)> {
        self.dataset
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| self.visibility.is_visible(&c.name))
            .map(|(i, c)| (i, column_width(self.dataset, i, c)))
            .collect()
    }
}

impl<'a> StatefulWidget for TableView<'a> {
    type State = TableViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.is_empty() {
            return;
        }

        let columns = self.visible_columns();
        if columns.is_empty() {
            buf.set_line(
                inner.x,
                inner.y,
                &Line::from(Span::styled("All columns hidden", Theme::empty_hint_style())),
                inner.width,
            );
            return;
        }

        let header: Vec<Span> = columns
            .iter()
            .map(|&(i, w)| {
                Span::styled(
                    format!("{}{:gap$}", fit(&self.dataset.columns[i].label, w), "", gap = COLUMN_GAP),
                    Theme::header_style(),
                )
            })
            .collect();
        buf.set_line(inner.x, inner.y, &Line::from(header), inner.width);

        state.clamp_scroll(usize::from(inner.height.saturating_sub(1)));

        for (row_idx, row_area) in row_areas(inner, state, self.dataset.rows.len()) {
            let row = &self.dataset.rows[row_idx];
            let style = if state.selected == Some(row_idx) {
                Theme::selected_style()
            } else {
                Theme::cell_style()
            };
            let cells: Vec<Span> = columns
                .iter()
                .map(|&(i, w)| {
                    let text = row.get(i).map_or("", String::as_str);
                    Span::styled(format!("{}{:gap$}", fit(text, w), "", gap = COLUMN_GAP), style)
                })
                .collect();
            if state.selected == Some(row_idx) {
                buf.set_style(row_area, style);
            }
            buf.set_line(row_area.x, row_area.y, &Line::from(cells), row_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            columns: vec![
                ColumnDescriptor::new("a", "Alpha"),
                ColumnDescriptor::new("b", "Beta"),
            ],
            rows: vec![
                vec!["one".into(), "uno".into()],
                vec!["two".into(), "dos".into()],
            ],
        }
    }

    fn text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.right())
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn hides_columns_the_map_marks_hidden_or_omits() {
        let ds = dataset();
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);

        let only_b: VisibilityMap = [("b".to_string(), true)].into_iter().collect();
        TableView::new(&ds, &only_b).render(area, &mut buf, &mut TableViewState::default());

        assert!(text(&buf, 0).starts_with("Beta"));
        assert!(!text(&buf, 0).contains("Alpha"));
        assert!(text(&buf, 1).starts_with("uno"));
        assert!(text(&buf, 2).starts_with("dos"));
    }

    #[test]
    fn all_hidden_shows_hint() {
        let ds = dataset();
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        TableView::new(&ds, &VisibilityMap::default()).render(area, &mut buf, &mut TableViewState::default());
        assert!(text(&buf, 0).contains("All columns hidden"));
    }

    #[test]
    fn row_areas_skip_the_header_and_respect_offset() {
        let state = TableViewState { selected: None, offset: 1 };
        let rows = row_areas(Rect::new(1, 1, 10, 4), &state, 3);
        assert_eq!(rows, vec![(1, Rect::new(1, 2, 10, 1)), (2, Rect::new(1, 3, 10, 1))]);
    }

    #[test]
    fn selection_scrolls_into_view() {
        let mut s = TableViewState::default();
        for _ in 0..5 {
            s.select_next(10);
        }
        assert_eq!(s.selected, Some(4));
        s.clamp_scroll(3);
        assert_eq!(s.offset, 2);
        s.select_prev(10);
        s.select_prev(10);
        s.select_prev(10);
        s.clamp_scroll(3);
        assert_eq!(s.offset, 1);
    }

    #[test]
    fn empty_table_never_gains_a_selection() {
        let mut s = TableViewState::default();
        s.select_prev(0);
        s.select_next(0);
        assert_eq!(s.selected, None);
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("ab", 0), "");
    }
}
