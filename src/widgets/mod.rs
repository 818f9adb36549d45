//! Widget state machines (rendering-agnostic)
//!
//! These structs hold animation state and react to scheduler timers and
//! discrete input events, but contain no rendering logic. The TUI frontend
//! reads them each frame.

pub mod typewriter;
pub mod window_chrome;

pub use typewriter::{AdvanceMode, TypewriterPhase, TypewriterState, TypewriterTiming};
pub use window_chrome::{ChromePhase, CloseKeyframe, CloseStage, WindowChromeState};
