//! Deterministic simulation module
//!
//! All scene logic lives here. This module must stay deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - Drawing only through the `Surface` trait, no platform dependencies

pub mod entity;
pub mod state;
pub mod tick;

pub use entity::{Enemy, EnemyKind, Motion, SpriteSheet};
pub use state::{Bounds, Scene, SceneStats, census};
pub use tick::tick;
