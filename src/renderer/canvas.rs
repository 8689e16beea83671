//! Canvas 2D surface (WASM only)

use glam::Vec2;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::{Rect, Surface};
use crate::error::DrawError;
use crate::sim::EnemyKind;

/// Draws into a `<canvas>` 2D context using one filmstrip image per kind
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    /// Indexed by `EnemyKind::index()`
    sheets: [HtmlImageElement; 3],
}

impl CanvasSurface {
    pub fn new(
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
        sheets: [HtmlImageElement; 3],
    ) -> Self {
        Self {
            ctx,
            width,
            height,
            sheets,
        }
    }
}

fn js_err(e: wasm_bindgen::JsValue) -> DrawError {
    DrawError::Surface(format!("{:?}", e))
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_sprite(&mut self, kind: EnemyKind, src: Rect, dest: Rect) -> Result<(), DrawError> {
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.sheets[kind.index()],
                src.x as f64,
                src.y as f64,
                src.w as f64,
                src.h as f64,
                dest.x as f64,
                dest.y as f64,
                dest.w as f64,
                dest.h as f64,
            )
            .map_err(js_err)
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2) -> Result<(), DrawError> {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
        Ok(())
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }
}
