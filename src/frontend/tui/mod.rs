//! TUI frontend (ratatui-based)
//!
//! Implements the Frontend trait using ratatui for terminal rendering and
//! crossterm for event handling and terminal management.

pub mod app;
pub mod control_panel;
pub mod demo_window;
pub mod layout;
pub mod view;

pub use app::TuiFrontend;
