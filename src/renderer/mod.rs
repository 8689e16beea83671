//! Drawing surface abstraction
//!
//! The simulation draws through the [`Surface`] trait. On web that is a
//! Canvas 2D context; headless runs and tests use [`RecordingSurface`].

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recording::{DrawCommand, RecordingSurface};

use std::ops::{Deref, DerefMut};

use glam::Vec2;

use crate::error::DrawError;
use crate::sim::{EnemyKind, Scene};

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// A 2D drawing target
///
/// `save`/`restore` bracket state changes such as `set_alpha`, like the
/// Canvas 2D state stack. Prefer [`StateGuard`] over calling them directly.
pub trait Surface {
    /// Clear the whole surface
    fn clear(&mut self);

    /// Blit `src` from `kind`'s sprite sheet into `dest`
    fn draw_sprite(&mut self, kind: EnemyKind, src: Rect, dest: Rect) -> Result<(), DrawError>;

    /// Stroke a 1px line
    fn stroke_line(&mut self, from: Vec2, to: Vec2) -> Result<(), DrawError>;

    /// Push the current drawing state
    fn save(&mut self);

    /// Pop the drawing state pushed by the matching `save`
    fn restore(&mut self);

    /// Set global opacity for subsequent draws (0-1)
    fn set_alpha(&mut self, alpha: f32);
}

/// Scoped drawing state: saves on creation, restores on drop
///
/// Restoration happens on every exit path, including `?` returns from a
/// failed draw call inside the scope.
pub struct StateGuard<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> StateGuard<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for StateGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for StateGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for StateGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// Draw every enemy in insertion order (no depth sort)
pub fn draw_scene<S: Surface + ?Sized>(scene: &Scene, surface: &mut S) -> Result<(), DrawError> {
    for enemy in scene.enemies() {
        enemy.draw(surface)?;
    }
    Ok(())
}
