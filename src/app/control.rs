//! The column-visibility control: a trigger button plus a click-away
//! checklist panel anchored to it.
//!
//! The control owns only its overlay state (open flag, anchor, click-away
//! listener, keyboard cursor).  Column visibility belongs to the parent: the
//! control reads the parent's [`VisibilityMap`] when drawing and answers a
//! checkbox press by sending a [`VisibilityUpdate`] through the parent's
//! [`VisibilitySetter`].

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::{StatefulWidget, Widget}};

use crate::config::DEFAULT_Z_INDEX;
use crate::core::anchor::OverlayState;
use crate::core::columns::{ColumnDescriptor, VisibilityMap, VisibilitySetter, VisibilityUpdate};
use crate::core::dismissal::{DismissalWatcher, PressOrigin};
use crate::core::placement::{self, PlacedOverlay, PositionerConfig};
use crate::core::pointer::{ElementId, PointerEvent};
use crate::ui::column_panel::{self, ColumnPanel, PanelState};
use crate::ui::elements::{ElementMap, BASE_LAYER};
use crate::ui::theme::Theme;
use crate::ui::trigger::TriggerButton;

/// Caller overrides for the panel's look and layer.  Set fields win over
/// the control's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayStyle {
    pub z_index: Option<u16>,
    pub style: Style,
}

impl OverlayStyle {
    /// Layer and style after merging the caller's values over the defaults.
    fn resolve(&self) -> (u16, Style) {
        (
            self.z_index.unwrap_or(DEFAULT_Z_INDEX),
            Theme::panel_style().patch(self.style),
        )
    }
}

/// Everything the parent hands the control.
#[derive(Debug, Clone)]
pub struct ControlProps {
    /// Identifier of the wrapper element, used verbatim.
    pub id: String,
    pub columns: Vec<ColumnDescriptor>,
    pub set_visibility: VisibilitySetter,
    pub style: OverlayStyle,
    pub positioner: PositionerConfig,
}

#[derive(Debug)]
pub struct ColumnVisibilityControl {
    props: ControlProps,
    overlay: OverlayState,
    watcher: DismissalWatcher,
    panel: PanelState,
    /// Where the panel landed on the last frame, if it was drawn.
    placed: Option<PlacedOverlay>,
}

impl ColumnVisibilityControl {
    pub fn mount(props: ControlProps) -> Self {
        tracing::debug!(id = %props.id, columns = props.columns.len(), "column control mounted");
        Self {
            props,
            overlay: OverlayState::new(),
            watcher: DismissalWatcher::new(),
            panel: PanelState::default(),
            placed: None,
        }
    }

    pub fn wrapper_id(&self) -> ElementId {
        ElementId::Control(self.props.id.clone())
    }

    pub fn is_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    pub fn placed(&self) -> Option<&PlacedOverlay> {
        self.placed.as_ref()
    }

    // ── operations ─────────────────────────────────────────────

    /// Trigger pressed: open if closed, close if open.
    pub fn activate(&mut self, event: &mut PointerEvent) {
        let was_visible = self.overlay.is_visible();
        self.overlay.activate(event);
        if !was_visible && self.overlay.is_visible() {
            self.panel = PanelState::default();
        }
    }

    pub fn dismiss(&mut self) {
        self.overlay.dismiss();
    }

    /// A checkbox changed to `value`.  The press stops here so neither the
    /// table nor the click-away listener reacts to it.
    pub fn on_toggle(&self, event: &mut PointerEvent, column: &str, value: bool) {
        event.stop_propagation();
        tracing::debug!(id = %self.props.id, column, value, "visibility update requested");
        self.props.set_visibility.request(VisibilityUpdate {
            column: column.to_string(),
            visible: value,
        });
    }

    /// Handler for presses whose current target is one of this control's
    /// elements.
    pub fn handle_pointer(&mut self, event: &mut PointerEvent, visibility: &VisibilityMap) {
        let Some((current, _)) = event.current_target().cloned() else {
            return;
        };
        match current {
            ElementId::Trigger => self.activate(event),
            ElementId::PanelRow(ref name) => {
                if let Some(idx) = self.props.columns.iter().position(|c| c.name == *name) {
                    self.panel.cursor = idx;
                }
                self.on_toggle(event, name, !visibility.is_visible(name));
            }
            _ => {}
        }
    }

    /// Document-level listener: runs after bubbling finishes.
    pub fn observe_press(&mut self, event: &PointerEvent) {
        let origin = PressOrigin {
            inside_overlay: event.is_within_overlay(),
            on_trigger: event.is_within(&ElementId::Trigger),
            propagation_stopped: event.is_propagation_stopped(),
        };
        if self.watcher.observe(origin) {
            tracing::debug!(
                id = %self.props.id,
                target = ?event.target,
                position = ?event.position,
                "press outside column panel"
            );
            self.dismiss();
            self.watcher.sync(self.overlay.is_visible());
        }
    }

    pub fn cursor_up(&mut self) {
        self.panel.select_prev();
    }

    pub fn cursor_down(&mut self) {
        self.panel.select_next(self.props.columns.len());
    }

    /// Element id of the row under the keyboard cursor.
    pub fn cursor_row(&self) -> Option<ElementId> {
        self.props
            .columns
            .get(self.panel.cursor)
            .map(|c| ElementId::PanelRow(c.name.clone()))
    }

    // ── rendering ──────────────────────────────────────────────

    /// The trigger as it should look this frame.
    pub fn trigger_button(&self, visibility: &VisibilityMap) -> TriggerButton {
        TriggerButton {
            active: self.overlay.is_visible(),
            badge: Some(format!(
                "{}/{}",
                visibility.visible_count(&self.props.columns),
                self.props.columns.len()
            )),
        }
    }

    /// Draw the trigger into `trigger_area` and, when open, the panel next
    /// to its anchor inside `boundary`.  Registers every painted element
    /// and brings the click-away listener in line with what is on screen.
    pub fn render(
        &mut self,
        trigger_area: Rect,
        boundary: Rect,
        parent: ElementId,
        visibility: &VisibilityMap,
        elements: &mut ElementMap,
        buf: &mut Buffer,
    ) {
        let wrapper = self.wrapper_id();
        elements.register(wrapper.clone(), trigger_area, BASE_LAYER, Some(parent));
        elements.register(ElementId::Trigger, trigger_area, BASE_LAYER, Some(wrapper.clone()));
        self.trigger_button(visibility).render(trigger_area, buf);

        self.placed = None;
        if let Some(anchor_rect) = self.overlay.anchor().and_then(|a| elements.rect(a)) {
            let (z_index, style) = self.props.style.resolve();
            let (width, height) = column_panel::desired_size(&self.props.columns);
            let placed = placement::position(anchor_rect, width, height, boundary, self.props.positioner);

            if !placed.area.is_empty() {
                if placed.clipped || placed.shifted {
                    tracing::trace!(
                        placement = %placed.placement,
                        clipped = placed.clipped,
                        shifted = placed.shifted,
                        "column panel adjusted to fit"
                    );
                }
                let rows = column_panel::panel_rows(&self.props.columns, visibility);
                let len = rows.len();
                ColumnPanel::new(rows)
                    .style(style)
                    .shadow(self.overlay.is_open())
                    .render(placed.area, buf, &mut self.panel);

                elements.register(ElementId::Panel, placed.area, z_index, Some(wrapper));
                for (idx, row_area) in column_panel::row_areas(placed.area, &self.panel, len) {
                    let name = self.props.columns[idx].name.clone();
                    elements.register(ElementId::PanelRow(name), row_area, z_index, Some(ElementId::Panel));
                }
                self.placed = Some(placed);
            }
        }

        self.watcher.sync(self.placed.is_some());
    }

    /// Consume the control.  Dropping the watcher releases the click-away
    /// listener.
    pub fn unmount(self) {
        tracing::debug!(id = %self.props.id, "column control unmounted");
    }
}

#[cfg(test)]
impl ColumnVisibilityControl {
    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn is_listening(&self) -> bool {
        self.watcher.is_listening()
    }
}
