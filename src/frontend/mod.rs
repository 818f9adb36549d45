//! Frontend abstraction layer
//!
//! Defines the `Frontend` trait the TUI implements: event polling, rendering
//! and cleanup. Input is mapped to gallery actions in [`input`].

pub mod events;
pub mod input;
pub mod tui;

use anyhow::Result;
pub use events::FrontendEvent;
pub use input::InputOutcome;
pub use tui::TuiFrontend;

use crate::core::Gallery;

/// Rendering surface for the gallery
pub trait Frontend {
    /// Return all pending input events (empty if none arrived within the
    /// frame's poll timeout).
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Paint one frame from the gallery's current state
    fn render(&mut self, gallery: &Gallery) -> Result<()>;

    /// Map an event to what the gallery should do, using the last frame's layout
    fn translate(&self, event: &FrontendEvent) -> InputOutcome;

    /// Restore the terminal
    fn cleanup(&mut self) -> Result<()>;
}
