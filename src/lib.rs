//! Night Parade - An animated canvas of wandering sprite enemies
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, animation, culling)
//! - `renderer`: Drawing surface abstraction (Canvas 2D on web, recording headless)
//! - `clock`: Frame driver timing
//! - `settings`: Scene configuration
//! - `error`: Error types

pub mod clock;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use clock::FrameClock;
pub use error::{ConfigError, DrawError, SceneResult};
pub use settings::{CullPolicy, SceneConfig};

use rand::Rng;

/// Scene configuration constants
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 700.0;
    pub const CANVAS_HEIGHT: f32 = 700.0;

    /// Milliseconds between enemy spawns
    pub const SPAWN_INTERVAL_MS: f32 = 500.0;

    /// Sprite animation
    pub const FRAME_INTERVAL_MS: f32 = 100.0;
    pub const MAX_FRAME: u32 = 5;
    pub const FRAMES_PER_SHEET: u32 = MAX_FRAME + 1;
    /// Sprites are drawn at half their source size
    pub const RENDER_SCALE: f32 = 0.5;

    /// Worm (ground crawler)
    pub const WORM_FRAME_WIDTH: f32 = 229.0;
    pub const WORM_FRAME_HEIGHT: f32 = 171.0;
    pub const WORM_MIN_VX: f32 = 0.1;
    pub const WORM_VX_RANGE: f32 = 0.1;

    /// Ghost (floater)
    pub const GHOST_FRAME_WIDTH: f32 = 261.0;
    pub const GHOST_FRAME_HEIGHT: f32 = 209.0;
    pub const GHOST_MIN_VX: f32 = 0.2;
    pub const GHOST_VX_RANGE: f32 = 0.2;
    /// Fraction of the canvas height ghosts may spawn in
    pub const GHOST_SPAWN_BAND: f32 = 0.6;
    pub const GHOST_MAX_CURVE: f32 = 2.0;
    /// Phase advance per tick (radians, not time-scaled)
    pub const GHOST_PHASE_STEP: f32 = 0.04;
    pub const GHOST_ALPHA: f32 = 0.5;

    /// Spider (climber)
    pub const SPIDER_FRAME_WIDTH: f32 = 310.0;
    pub const SPIDER_FRAME_HEIGHT: f32 = 175.0;
    pub const SPIDER_MIN_VY: f32 = 0.8;
    pub const SPIDER_VY_RANGE: f32 = 0.3;
    /// Fraction of the canvas height a spider may descend to
    pub const SPIDER_DROP_BAND: f32 = 0.5;
    /// Thread extends this far past the spider's top edge
    pub const SPIDER_THREAD_OVERSHOOT: f32 = 10.0;
}

/// Uniform sample in [min, min + range)
///
/// Written as `min + u * range` so a zero or negative range never panics;
/// it just collapses (or mirrors) the interval.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, range: f32) -> f32 {
    min + rng.random::<f32>() * range
}
