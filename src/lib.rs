//! motion-gallery - a terminal gallery of animated demo widgets
//!
//! Widgets are driven by a session configuration store (defaults plus
//! overrides) and shown or hidden through a visibility registry. Their
//! animations run as explicit state machines on a virtual-clock scheduler.

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod frontend;
pub mod theme;
pub mod widgets;

pub use crate::config::{ConfigStore, WidgetKind};
pub use crate::core::{DemoTable, Gallery, GalleryAction};
pub use crate::error::{GalleryError, GalleryResult};
