//! Whole-frame rendering.  Rebuilds the element map as it paints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::app::state::{ActiveView, AppState};
use crate::core::pointer::ElementId;

use super::elements::BASE_LAYER;
use super::layout::AppLayout;
use super::popup::HelpPopup;
use super::table_view::{self, TableView};
use super::theme::Theme;
use super::trigger::TRIGGER_TOOLTIP;

/// Appended to the status bar while the column panel is cut off.
const CLIPPED_NOTE: &str = "  (more columns: scroll the panel)";

pub fn render(state: &mut AppState, area: Rect, buf: &mut Buffer) {
    state.elements.clear();
    state.elements.register(ElementId::Screen, area, BASE_LAYER, None);
    let layout = AppLayout::from_area(area);

    // ── table pane ─────────────────────────────────────────────
    let table_block = Block::default()
        .title(format!(" {} ", state.title))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    let table_inner = table_block.inner(layout.table_area);

    state
        .elements
        .register(ElementId::TablePane, layout.table_area, BASE_LAYER, Some(ElementId::Screen));
    TableView::new(&state.dataset, &state.visibility)
        .block(table_block)
        .render(layout.table_area, buf, &mut state.table_state);
    for (row, row_area) in table_view::row_areas(table_inner, &state.table_state, state.dataset.rows.len()) {
        state
            .elements
            .register(ElementId::TableRow(row), row_area, BASE_LAYER, Some(ElementId::TablePane));
    }

    // ── column control (trigger in the pane's top border) ──────
    let trigger_width = state.control.trigger_button(&state.visibility).width();
    let trigger_area = layout.trigger_area(trigger_width);
    state.control.render(
        trigger_area,
        table_inner,
        ElementId::TablePane,
        &state.visibility,
        &mut state.elements,
        buf,
    );

    // ── status bar ─────────────────────────────────────────────
    let hint = state.config.status_bar_hint();
    let mut status_text = if state.hovering_trigger {
        TRIGGER_TOOLTIP.to_string()
    } else {
        state.status_message.clone().unwrap_or(hint)
    };
    if state.control.placed().is_some_and(|p| p.clipped) {
        status_text.push_str(CLIPPED_NOTE);
    }
    Paragraph::new(status_text)
        .style(Theme::status_bar_style())
        .render(layout.status_area, buf);

    if state.active_view == ActiveView::Help {
        HelpPopup { config: &state.config }.render(area, buf);
    }
}
