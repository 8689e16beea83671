//! Frame driver timing
//!
//! Turns the host's per-frame timestamps into millisecond deltas and runs
//! one clear/update/draw cycle per frame.

use crate::error::DrawError;
use crate::renderer::Surface;
use crate::sim::Scene;

/// Converts monotonic frame timestamps into deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Timestamp of the previous frame (baseline 0)
    last_ms: f64,
    /// Optional cap on a single delta
    max_delta_ms: Option<f32>,
    frames: u64,
}

impl FrameClock {
    pub fn new(max_delta_ms: Option<f32>) -> Self {
        Self {
            last_ms: 0.0,
            max_delta_ms,
            frames: 0,
        }
    }

    /// Milliseconds since the previous timestamp
    ///
    /// The first call measures from 0, so hosts should start at 0. A timestamp
    /// older than the last one yields 0 and leaves the baseline alone.
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        self.frames += 1;

        let raw = timestamp_ms - self.last_ms;
        if raw.is_nan() || raw < 0.0 {
            log::debug!("Non-monotonic frame timestamp {} < {}", timestamp_ms, self.last_ms);
            return 0.0;
        }
        self.last_ms = timestamp_ms;

        let dt = raw as f32;
        match self.max_delta_ms {
            Some(max) if dt > max => {
                log::debug!("Clamped frame delta {:.1} ms to {:.1} ms", dt, max);
                max
            }
            _ => dt,
        }
    }

    pub fn last_timestamp(&self) -> f64 {
        self.last_ms
    }

    /// Frames seen so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Run one frame: clear, update, draw
pub fn step_frame<S: Surface + ?Sized>(
    scene: &mut Scene,
    clock: &mut FrameClock,
    timestamp_ms: f64,
    surface: &mut S,
) -> Result<(), DrawError> {
    surface.clear();
    let dt = clock.advance(timestamp_ms);
    scene.update(dt);
    scene.draw(surface)
}

/// Drive `frames` evenly spaced frames, `frame_ms` apart
///
/// A draw failure is logged and the run carries on, like a browser frame loop.
pub fn run_fixed<S: Surface + ?Sized>(
    scene: &mut Scene,
    clock: &mut FrameClock,
    frames: u32,
    frame_ms: f64,
    surface: &mut S,
) -> u32 {
    let start = clock.last_timestamp();
    let mut failures = 0;
    for i in 1..=frames {
        let timestamp = start + i as f64 * frame_ms;
        if let Err(e) = step_frame(scene, clock, timestamp, surface) {
            log::warn!("Draw error: {}", e);
            failures += 1;
        }
    }
    failures
}
