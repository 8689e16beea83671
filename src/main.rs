//! Night Parade entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_scene {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

    use night_parade::SceneConfig;
    use night_parade::clock::{FrameClock, step_frame};
    use night_parade::renderer::CanvasSurface;
    use night_parade::sim::{EnemyKind, Scene};

    /// Only the first few draw errors are logged
    const MAX_LOGGED_DRAW_ERRORS: u32 = 3;

    /// Everything the frame loop needs
    struct App {
        scene: Scene,
        clock: FrameClock,
        surface: CanvasSurface,
        draw_errors: u32,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            if let Err(e) = step_frame(&mut self.scene, &mut self.clock, time, &mut self.surface) {
                self.draw_errors += 1;
                if self.draw_errors <= MAX_LOGGED_DRAW_ERRORS {
                    log::warn!("Draw error: {}", e);
                }
            }
        }
    }

    fn js_error(msg: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&msg.to_string())
    }

    /// Look up a preloaded `<img>` holding `kind`'s filmstrip
    fn sprite_sheet(document: &Document, kind: EnemyKind) -> Result<HtmlImageElement, JsValue> {
        document
            .get_element_by_id(kind.as_str())
            .ok_or_else(|| js_error(format!("missing <img id=\"{}\">", kind.as_str())))?
            .dyn_into::<HtmlImageElement>()
            .map_err(|_| js_error(format!("#{} is not an <img>", kind.as_str())))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("Night Parade starting...");

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;

        let mut config = SceneConfig::load();
        if config.seed == 0 {
            config.seed = js_sys::Date::now() as u64;
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas1")
            .ok_or_else(|| js_error("no #canvas1"))?
            .dyn_into()
            .map_err(|_| js_error("#canvas1 is not a canvas"))?;
        canvas.set_width(config.width as u32);
        canvas.set_height(config.height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| js_error("2d context unavailable"))?
            .dyn_into()
            .map_err(|_| js_error("unexpected context type"))?;

        let sheets = [
            sprite_sheet(&document, EnemyKind::Worm)?,
            sprite_sheet(&document, EnemyKind::Ghost)?,
            sprite_sheet(&document, EnemyKind::Spider)?,
        ];
        let surface = CanvasSurface::new(ctx, config.width as f64, config.height as f64, sheets);

        let clock = FrameClock::new(config.max_delta_ms);
        let scene = Scene::new(config).map_err(js_error)?;
        let app = Rc::new(RefCell::new(App {
            scene,
            clock,
            surface,
            draw_errors: 0,
        }));

        // First frame at the zero baseline, then follow the browser's cadence
        app.borrow_mut().frame(0.0);
        request_animation_frame(app);

        log::info!("Night Parade running!");
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_scene::run()
}

/// Headless run length (10 s at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAMES: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use night_parade::clock::{FrameClock, run_fixed, step_frame};
    use night_parade::renderer::RecordingSurface;
    use night_parade::sim::{Scene, census};
    use night_parade::{CullPolicy, SceneConfig};

    env_logger::init();
    log::info!("Night Parade (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the canvas version");

    let mut config = SceneConfig::load();
    if let Some(seed) = std::env::args().nth(1).and_then(|s| s.parse().ok()) {
        config.seed = seed;
    }
    if let Ok(policy) = std::env::var("NIGHT_PARADE_CULL") {
        match CullPolicy::from_str(&policy) {
            Some(p) => config.cull_policy = p,
            None => log::warn!("Unknown cull policy '{}', keeping {}", policy, config.cull_policy.as_str()),
        }
    }

    let mut clock = FrameClock::new(config.max_delta_ms);
    let mut scene = match Scene::new(config) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Invalid scene config: {}", e);
            std::process::exit(1);
        }
    };
    let mut surface = RecordingSurface::new();

    if let Err(e) = step_frame(&mut scene, &mut clock, 0.0, &mut surface) {
        log::warn!("Draw error: {}", e);
    }
    let failures = run_fixed(&mut scene, &mut clock, HEADLESS_FRAMES, 1000.0 / 60.0, &mut surface);

    let stats = scene.stats();
    let [worms, ghosts, spiders] = census(scene.enemies());
    log::info!(
        "{} ticks, {:.0} ms simulated, {} draw failures",
        scene.ticks(),
        scene.elapsed_ms(),
        failures
    );
    println!(
        "spawned {} / culled {} / live {} (worms {}, ghosts {}, spiders {}), {} sprites drawn",
        stats.spawned,
        stats.culled,
        scene.enemies().len(),
        worms,
        ghosts,
        spiders,
        surface.sprites_drawn
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
