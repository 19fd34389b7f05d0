//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells in
//! the terminal buffer, recording what it painted in the element map.

pub mod column_panel;
pub mod elements;
pub mod layout;
pub mod popup;
pub mod screen;
pub mod table_view;
pub mod theme;
pub mod trigger;
