//! The button that opens the column panel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

pub const TRIGGER_LABEL: &str = " ≡ Columns ";

/// Shown in the status bar while the pointer rests on the trigger.
pub const TRIGGER_TOOLTIP: &str = "View Columns";

pub struct TriggerButton {
    /// Highlight while the panel is showing.
    pub active: bool,
    /// `visible/total` badge, e.g. `4/6`.
    pub badge: Option<String>,
}

impl TriggerButton {
    /// Cells needed to draw the button with its badge.
    pub fn width(&self) -> u16 {
        let badge = self.badge.as_ref().map_or(0, |b| b.chars().count() + 1);
        u16::try_from(TRIGGER_LABEL.chars().count() + badge).unwrap_or(u16::MAX)
    }
}

impl Widget for TriggerButton {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Theme::trigger_style(self.active);
        let mut spans = vec![Span::styled(TRIGGER_LABEL, style)];
        if let Some(badge) = self.badge {
            spans.push(Span::styled(format!("{badge} "), style));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
