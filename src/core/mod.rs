//! Core logic layer
//!
//! Timer scheduling, the demo registration table and the gallery that ties
//! configuration, visibility and widget state machines together.
//! NO imports from frontend/ or rendering code.

pub mod demos;
pub mod gallery;
pub mod scheduler;

pub use demos::{Demo, DemoTable};
pub use gallery::{DemoInstance, Gallery, GalleryAction};
pub use scheduler::{Fired, InstanceId, Scheduler, TimerEvent, TimerId};
