//! Data layer - pure state without UI coupling
//!
//! NO imports from frontend/ or any rendering code.

pub mod visibility;

pub use visibility::VisibilityRegistry;
