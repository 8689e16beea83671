//! Headless surface that records draw calls

use glam::Vec2;

use super::{Rect, Surface};
use crate::error::DrawError;
use crate::sim::EnemyKind;

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Sprite {
        kind: EnemyKind,
        src: Rect,
        dest: Rect,
        /// Global alpha in effect when drawn
        alpha: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
    },
}

/// Records every draw call instead of rasterizing
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    alpha: f32,
    saved: Vec<f32>,
    fail_next: bool,
    /// Total sprite blits across all clears
    pub sprites_drawn: u64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            alpha: 1.0,
            saved: Vec::new(),
            fail_next: false,
            sprites_drawn: 0,
        }
    }

    /// Commands recorded since the last clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current global alpha
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Number of un-restored saves
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Make the next sprite or line draw fail (for error-path tests)
    pub fn fail_next_draw(&mut self) {
        self.fail_next = true;
    }

    fn check_failure(&mut self) -> Result<(), DrawError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(DrawError::Surface("injected failure".to_string()));
        }
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_sprite(&mut self, kind: EnemyKind, src: Rect, dest: Rect) -> Result<(), DrawError> {
        self.check_failure()?;
        self.commands.push(DrawCommand::Sprite {
            kind,
            src,
            dest,
            alpha: self.alpha,
        });
        self.sprites_drawn += 1;
        Ok(())
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2) -> Result<(), DrawError> {
        self.check_failure()?;
        self.commands.push(DrawCommand::Line { from, to });
        Ok(())
    }

    fn save(&mut self) {
        self.saved.push(self.alpha);
    }

    fn restore(&mut self) {
        match self.saved.pop() {
            Some(alpha) => self.alpha = alpha,
            None => log::warn!("{}", DrawError::UnbalancedRestore),
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }
}
