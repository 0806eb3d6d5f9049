//! Core primitives.
//!
//! Geometry and randomness shared by every simulation component.

pub mod vec2;
pub mod rect;
pub mod rng;

// Re-export core types
pub use vec2::Vec2;
pub use rect::Rect;
pub use rng::DeterministicRng;
