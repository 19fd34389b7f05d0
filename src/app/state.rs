//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).
//! `AppState` is also the *parent* of the column control: it owns the
//! visibility map and applies the update requests the control sends.

use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::control::{ColumnVisibilityControl, ControlProps, OverlayStyle};
use crate::config::AppConfig;
use crate::core::columns::{VisibilityMap, VisibilitySetter, VisibilityUpdate};
use crate::core::dataset::Dataset;
use crate::core::placement::PositionerConfig;
use crate::ui::elements::ElementMap;
use crate::ui::table_view::TableViewState;

/// Wrapper id handed to the column control.
pub const CONTROL_ID: &str = "column-visibility";

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Table,
    Help,
}

/// Top-level application state.
pub struct AppState {
    /// Shown in the table pane's title.
    pub title: String,
    pub dataset: Dataset,
    /// The single source of truth for which columns are shown.
    pub visibility: VisibilityMap,
    pub control: ColumnVisibilityControl,
    /// Row selection and scroll for the table.
    pub table_state: TableViewState,
    /// Elements painted on the last frame, for hit-testing.
    pub elements: ElementMap,
    pub config: AppConfig,
    pub active_view: ActiveView,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Pointer is resting on the trigger (shows its tooltip).
    pub hovering_trigger: bool,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl AppState {
    pub fn new(title: String, dataset: Dataset, config: AppConfig, set_visibility: VisibilitySetter) -> Self {
        let visibility = VisibilityMap::all_visible_except(&dataset.columns, &config.hidden_columns);
        let control = ColumnVisibilityControl::mount(ControlProps {
            id: CONTROL_ID.to_string(),
            columns: dataset.columns.clone(),
            set_visibility,
            style: OverlayStyle {
                z_index: Some(config.z_index),
                ..OverlayStyle::default()
            },
            positioner: PositionerConfig {
                placement: config.placement,
                ..PositionerConfig::default()
            },
        });

        Self {
            title,
            dataset,
            visibility,
            control,
            table_state: TableViewState::default(),
            elements: ElementMap::new(),
            config,
            active_view: ActiveView::default(),
            status_message: None,
            hovering_trigger: false,
            should_quit: false,
        }
    }

    /// Apply every update request already queued on `updates`.
    pub fn apply_pending(&mut self, updates: &mut UnboundedReceiver<VisibilityUpdate>) {
        while let Ok(update) = updates.try_recv() {
            self.apply_visibility_update(update);
        }
    }

    /// Apply an update request from the column control.
    pub fn apply_visibility_update(&mut self, update: VisibilityUpdate) {
        self.visibility = update.apply(&self.visibility);
        let shown = self.visibility.visible_count(&self.dataset.columns);
        tracing::debug!(
            column = %update.column,
            visible = update.visible,
            entries = self.visibility.len(),
            shown,
            "visibility update applied"
        );
        self.status_message = Some(format!(
            "{} column '{}' ({shown}/{} shown)",
            if update.visible { "Showing" } else { "Hiding" },
            update.column,
            self.dataset.columns.len(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pointer::ElementId;

    #[test]
    fn config_hidden_columns_seed_the_map() {
        let mut config = AppConfig::default();
        config.hidden_columns = vec!["city".into()];
        let (setter, _rx) = VisibilitySetter::channel();
        let state = AppState::new("demo".into(), Dataset::demo(), config, setter);
        assert!(!state.visibility.is_visible("city"));
        assert!(state.visibility.is_visible("name"));
        assert_eq!(state.control.wrapper_id(), ElementId::Control(CONTROL_ID.to_string()));
    }

    #[test]
    fn applying_update_changes_only_that_column() {
        let (setter, _rx) = VisibilitySetter::channel();
        let mut state = AppState::new("demo".into(), Dataset::demo(), AppConfig::default(), setter);
        let before = state.visibility.clone();
        state.apply_visibility_update(VisibilityUpdate { column: "role".into(), visible: false });
        assert_eq!(state.visibility, before.with("role", false));
        assert!(state.status_message.as_deref().unwrap().starts_with("Hiding column 'role'"));
    }
}
