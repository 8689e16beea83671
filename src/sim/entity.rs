//! Enemy entities
//!
//! Every enemy shares drift, sprite animation and off-screen flagging. The
//! kind-specific part lives in [`Motion`]:
//! - Worm: crawls along the ground line
//! - Ghost: floats on a sine wobble, drawn half transparent
//! - Spider: drops on a thread, bounces at a random depth and climbs back out

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Bounds;
use crate::consts::*;
use crate::error::DrawError;
use crate::renderer::{Rect, StateGuard, Surface};
use crate::uniform;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Worm,
    Ghost,
    Spider,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Worm, EnemyKind::Ghost, EnemyKind::Spider];

    /// Stable index (sprite sheet slot)
    pub fn index(self) -> usize {
        match self {
            EnemyKind::Worm => 0,
            EnemyKind::Ghost => 1,
            EnemyKind::Spider => 2,
        }
    }

    /// Asset name, also the `<img>` element id on web
    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Worm => "worm",
            EnemyKind::Ghost => "ghost",
            EnemyKind::Spider => "spider",
        }
    }

    pub fn sprite(self) -> SpriteSheet {
        match self {
            EnemyKind::Worm => SpriteSheet::new(WORM_FRAME_WIDTH, WORM_FRAME_HEIGHT),
            EnemyKind::Ghost => SpriteSheet::new(GHOST_FRAME_WIDTH, GHOST_FRAME_HEIGHT),
            EnemyKind::Spider => SpriteSheet::new(SPIDER_FRAME_WIDTH, SPIDER_FRAME_HEIGHT),
        }
    }
}

/// Horizontal filmstrip of equally sized frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSheet {
    pub frame_width: f32,
    pub frame_height: f32,
    pub frames: u32,
}

impl SpriteSheet {
    pub const fn new(frame_width: f32, frame_height: f32) -> Self {
        Self {
            frame_width,
            frame_height,
            frames: FRAMES_PER_SHEET,
        }
    }

    /// On-screen size of one frame
    pub fn rendered_size(&self) -> Vec2 {
        Vec2::new(self.frame_width, self.frame_height) * RENDER_SCALE
    }

    /// Source rectangle of frame `frame` within the sheet
    pub fn frame_rect(&self, frame: u32) -> Rect {
        Rect::new(
            frame as f32 * self.frame_width,
            0.0,
            self.frame_width,
            self.frame_height,
        )
    }
}

/// Kind-specific motion state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Straight leftward drift
    Crawl,
    /// Sine wobble on y; `angle` advances a fixed step per tick
    Float { angle: f32, curve: f32 },
    /// Vertical travel; `vy` flips once past `max_height`
    Dangle { vy: f32, max_height: f32 },
}

/// A single enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Leftward speed (pixels per ms)
    pub vx: f32,
    /// Rendered size
    pub width: f32,
    pub height: f32,
    /// Current animation frame (0..=MAX_FRAME)
    pub frame: u32,
    pub frame_timer: f32,
    pub frame_interval: f32,
    pub motion: Motion,
    /// Set once the enemy has left the screen; never cleared
    marked_for_deletion: bool,
}

impl Enemy {
    /// Build an enemy with explicit state (animation at frame 0)
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, vx: f32, motion: Motion) -> Self {
        let size = kind.sprite().rendered_size();
        Self {
            id,
            kind,
            pos,
            vx,
            width: size.x,
            height: size.y,
            frame: 0,
            frame_timer: 0.0,
            frame_interval: FRAME_INTERVAL_MS,
            motion,
            marked_for_deletion: false,
        }
    }

    /// Spawn an enemy of `kind` with randomized parameters
    pub fn spawn<R: Rng + ?Sized>(kind: EnemyKind, id: u32, bounds: Bounds, rng: &mut R) -> Self {
        let size = kind.sprite().rendered_size();

        match kind {
            EnemyKind::Worm => {
                // Enters from the right, feet on the ground line
                let pos = Vec2::new(bounds.width, bounds.height - size.y);
                let vx = uniform(rng, WORM_MIN_VX, WORM_VX_RANGE);
                Self::new(id, kind, pos, vx, Motion::Crawl)
            }
            EnemyKind::Ghost => {
                let y = uniform(rng, 0.0, bounds.height * GHOST_SPAWN_BAND);
                let vx = uniform(rng, GHOST_MIN_VX, GHOST_VX_RANGE);
                let curve = uniform(rng, 0.0, GHOST_MAX_CURVE);
                Self::new(
                    id,
                    kind,
                    Vec2::new(bounds.width, y),
                    vx,
                    Motion::Float { angle: 0.0, curve },
                )
            }
            EnemyKind::Spider => {
                // Starts just above the top edge, no horizontal drift
                let x = uniform(rng, 0.0, bounds.width - size.x);
                let vy = uniform(rng, SPIDER_MIN_VY, SPIDER_VY_RANGE);
                let max_height = uniform(rng, 0.0, bounds.height * SPIDER_DROP_BAND);
                Self::new(
                    id,
                    kind,
                    Vec2::new(x, -size.y),
                    0.0,
                    Motion::Dangle { vy, max_height },
                )
            }
        }
    }

    /// Whether the enemy is waiting to be culled
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.marked_for_deletion
    }

    /// Advance by `dt` milliseconds
    pub fn update(&mut self, dt: f32) {
        self.pos.x -= self.vx * dt;

        if self.frame_timer > self.frame_interval {
            self.frame = if self.frame < MAX_FRAME { self.frame + 1 } else { 0 };
            self.frame_timer = 0.0;
        } else {
            self.frame_timer += dt;
        }

        // Fully past the left edge. Spiders never drift, so this is a no-op for them.
        if self.pos.x < -self.width {
            self.marked_for_deletion = true;
        }

        match &mut self.motion {
            Motion::Crawl => {}
            Motion::Float { angle, curve } => {
                self.pos.y += angle.sin() * *curve;
                *angle += GHOST_PHASE_STEP;
            }
            Motion::Dangle { vy, max_height } => {
                self.pos.y += *vy;
                // Only flip on the way down so the bounce can't re-trigger
                if *vy > 0.0 && self.pos.y > *max_height {
                    *vy = -*vy;
                }
                if self.pos.y < -2.0 * self.height {
                    self.marked_for_deletion = true;
                }
            }
        }
    }

    /// Source rectangle for the current frame
    pub fn source_rect(&self) -> Rect {
        self.kind.sprite().frame_rect(self.frame)
    }

    /// On-screen rectangle
    pub fn dest_rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Center x of the sprite, where a spider's thread hangs
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), DrawError> {
        match self.motion {
            Motion::Crawl => self.blit(surface),
            Motion::Float { .. } => {
                let mut scoped = StateGuard::new(surface);
                scoped.set_alpha(GHOST_ALPHA);
                self.blit(&mut *scoped)
            }
            Motion::Dangle { .. } => {
                let cx = self.center_x();
                surface.stroke_line(
                    Vec2::new(cx, 0.0),
                    Vec2::new(cx, self.pos.y + SPIDER_THREAD_OVERSHOOT),
                )?;
                self.blit(surface)
            }
        }
    }

    fn blit<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), DrawError> {
        surface.draw_sprite(self.kind, self.source_rect(), self.dest_rect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Bounds = Bounds {
        width: 700.0,
        height: 700.0,
    };

    fn spawn(kind: EnemyKind, seed: u64) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(seed);
        Enemy::spawn(kind, 1, BOUNDS, &mut rng)
    }

    #[test]
    fn test_rendered_size_is_half_scale() {
        let worm = spawn(EnemyKind::Worm, 1);
        assert_eq!((worm.width, worm.height), (114.5, 85.5));
        let ghost = spawn(EnemyKind::Ghost, 1);
        assert_eq!((ghost.width, ghost.height), (130.5, 104.5));
        let spider = spawn(EnemyKind::Spider, 1);
        assert_eq!((spider.width, spider.height), (155.0, 87.5));
    }

    #[test]
    fn test_worm_spawn() {
        for seed in 0..50 {
            let worm = spawn(EnemyKind::Worm, seed);
            assert_eq!(worm.pos, Vec2::new(700.0, 700.0 - 85.5));
            assert!((0.1..0.2).contains(&worm.vx));
            assert_eq!(worm.motion, Motion::Crawl);
            assert!(!worm.is_marked());
        }
    }

    #[test]
    fn test_ghost_spawn() {
        for seed in 0..50 {
            let ghost = spawn(EnemyKind::Ghost, seed);
            assert_eq!(ghost.pos.x, 700.0);
            assert!((0.0..420.0).contains(&ghost.pos.y));
            assert!((0.2..0.4).contains(&ghost.vx));
            match ghost.motion {
                Motion::Float { angle, curve } => {
                    assert_eq!(angle, 0.0);
                    assert!((0.0..2.0).contains(&curve));
                }
                other => panic!("unexpected motion {:?}", other),
            }
        }
    }

    #[test]
    fn test_spider_spawn() {
        for seed in 0..50 {
            let spider = spawn(EnemyKind::Spider, seed);
            assert!((0.0..700.0 - 155.0).contains(&spider.pos.x));
            assert_eq!(spider.pos.y, -87.5);
            assert_eq!(spider.vx, 0.0);
            match spider.motion {
                Motion::Dangle { vy, max_height } => {
                    assert!((0.8..1.1).contains(&vy));
                    assert!((0.0..350.0).contains(&max_height));
                }
                other => panic!("unexpected motion {:?}", other),
            }
        }
    }

    #[test]
    fn test_drift_is_time_scaled() {
        let mut worm = Enemy::new(1, EnemyKind::Worm, Vec2::new(500.0, 0.0), 0.15, Motion::Crawl);
        worm.update(100.0);
        assert!((worm.pos.x - 485.0).abs() < 1e-4);
        worm.update(0.0);
        assert!((worm.pos.x - 485.0).abs() < 1e-4);
    }

    #[test]
    fn test_frame_advances_after_interval() {
        let mut worm = Enemy::new(1, EnemyKind::Worm, Vec2::new(500.0, 0.0), 0.1, Motion::Crawl);
        // Timer must strictly exceed the interval before the frame moves
        worm.update(50.0);
        worm.update(50.0);
        assert_eq!(worm.frame, 0);
        assert_eq!(worm.frame_timer, 100.0);
        worm.update(50.0);
        assert_eq!(worm.frame, 0);
        worm.update(50.0);
        assert_eq!(worm.frame, 1);
        assert_eq!(worm.frame_timer, 0.0);
    }

    #[test]
    fn test_frame_wraps_to_zero() {
        let mut worm = Enemy::new(1, EnemyKind::Worm, Vec2::new(500.0, 0.0), 0.1, Motion::Crawl);
        worm.frame = MAX_FRAME;
        worm.frame_timer = 101.0;
        worm.update(16.0);
        assert_eq!(worm.frame, 0);
    }

    #[test]
    fn test_worm_marked_past_left_edge() {
        let mut worm = Enemy::new(1, EnemyKind::Worm, Vec2::new(-110.0, 0.0), 0.1, Motion::Crawl);
        worm.update(40.0); // x = -114.0, not yet past -114.5
        assert!(!worm.is_marked());
        worm.update(10.0); // x = -115.0
        assert!(worm.is_marked());
    }

    #[test]
    fn test_ghost_wobble() {
        let mut ghost = Enemy::new(
            1,
            EnemyKind::Ghost,
            Vec2::new(600.0, 100.0),
            0.3,
            Motion::Float { angle: 0.0, curve: 1.5 },
        );
        // sin(0) = 0 on the first tick
        ghost.update(16.0);
        assert_eq!(ghost.pos.y, 100.0);
        ghost.update(16.0);
        let expected = 100.0 + (0.04f32).sin() * 1.5;
        assert!((ghost.pos.y - expected).abs() < 1e-5);
        match ghost.motion {
            Motion::Float { angle, .. } => assert!((angle - 0.08).abs() < 1e-6),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_ghost_phase_ignores_delta() {
        let mut a = spawn(EnemyKind::Ghost, 3);
        let mut b = a.clone();
        a.update(1.0);
        b.update(100.0);
        assert_eq!(a.pos.y, b.pos.y);
        assert_eq!(a.motion, b.motion);
    }

    #[test]
    fn test_spider_bounces_once_and_leaves_through_top() {
        let mut spider = Enemy::new(
            1,
            EnemyKind::Spider,
            Vec2::new(100.0, -87.5),
            0.0,
            Motion::Dangle { vy: 1.0, max_height: 20.0 },
        );

        let mut flips = 0;
        let mut last_vy: f32 = 1.0;
        let mut ticks = 0;
        while !spider.is_marked() {
            spider.update(16.0);
            ticks += 1;
            let Motion::Dangle { vy, .. } = spider.motion else { unreachable!() };
            if vy.signum() != last_vy.signum() {
                flips += 1;
            }
            last_vy = vy;
            assert!(ticks < 1000, "spider never left");
        }

        assert_eq!(flips, 1);
        assert!(spider.pos.y < -2.0 * spider.height);
        // Horizontal position never changes
        assert_eq!(spider.pos.x, 100.0);
    }

    #[test]
    fn test_spider_no_double_flip_when_spawned_below_threshold() {
        // Already past max_height and moving up: must not flip back down
        let mut spider = Enemy::new(
            1,
            EnemyKind::Spider,
            Vec2::new(0.0, 50.0),
            0.0,
            Motion::Dangle { vy: -1.0, max_height: 10.0 },
        );
        spider.update(16.0);
        assert_eq!(spider.motion, Motion::Dangle { vy: -1.0, max_height: 10.0 });
        assert_eq!(spider.pos.y, 49.0);
    }

    #[test]
    fn test_source_rect_slices_frame() {
        let mut spider = spawn(EnemyKind::Spider, 2);
        spider.frame = 3;
        assert_eq!(spider.source_rect(), Rect::new(930.0, 0.0, 310.0, 175.0));
    }

    #[test]
    fn test_worm_draw() {
        let worm = spawn(EnemyKind::Worm, 4);
        let mut surface = RecordingSurface::new();
        worm.draw(&mut surface).unwrap();
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Sprite {
                kind: EnemyKind::Worm,
                src: Rect::new(0.0, 0.0, 229.0, 171.0),
                dest: worm.dest_rect(),
                alpha: 1.0,
            }]
        );
    }

    #[test]
    fn test_ghost_draw_is_translucent_and_scoped() {
        let ghost = spawn(EnemyKind::Ghost, 4);
        let worm = spawn(EnemyKind::Worm, 4);
        let mut surface = RecordingSurface::new();
        ghost.draw(&mut surface).unwrap();
        worm.draw(&mut surface).unwrap();

        let alphas: Vec<f32> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { alpha, .. } => Some(*alpha),
                _ => None,
            })
            .collect();
        assert_eq!(alphas, vec![0.5, 1.0]);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_ghost_draw_failure_still_restores_alpha() {
        let ghost = spawn(EnemyKind::Ghost, 4);
        let mut surface = RecordingSurface::new();
        surface.fail_next_draw();
        assert!(ghost.draw(&mut surface).is_err());
        assert_eq!(surface.alpha(), 1.0);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_spider_draws_thread_then_sprite() {
        let mut spider = spawn(EnemyKind::Spider, 6);
        spider.pos = Vec2::new(40.0, 120.0);
        let mut surface = RecordingSurface::new();
        spider.draw(&mut surface).unwrap();

        let commands = surface.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            DrawCommand::Line {
                from: Vec2::new(117.5, 0.0),
                to: Vec2::new(117.5, 130.0),
            }
        );
        assert!(matches!(commands[1], DrawCommand::Sprite { kind: EnemyKind::Spider, .. }));
    }

    #[test]
    fn test_snapshot_round_trip_reproduces_trajectory() {
        for kind in EnemyKind::ALL {
            let mut original = spawn(kind, 11);
            original.update(16.0);

            let json = serde_json::to_string(&original).unwrap();
            let mut restored: Enemy = serde_json::from_str(&json).unwrap();
            assert_eq!(restored, original);

            for dt in [16.0, 17.0, 250.0, 0.0, 33.3] {
                original.update(dt);
                restored.update(dt);
                assert_eq!(restored, original);
            }
        }
    }

    fn kind_strategy() -> impl Strategy<Value = EnemyKind> {
        prop_oneof![
            Just(EnemyKind::Worm),
            Just(EnemyKind::Ghost),
            Just(EnemyKind::Spider),
        ]
    }

    proptest! {
        #[test]
        fn prop_frame_steps_by_one_and_wraps(
            kind in kind_strategy(),
            seed in any::<u64>(),
            deltas in prop::collection::vec(0.0f32..250.0, 1..300),
        ) {
            let mut enemy = spawn(kind, seed);
            for dt in deltas {
                let before = enemy.frame;
                enemy.update(dt);
                prop_assert!(enemy.frame <= MAX_FRAME);
                prop_assert!(enemy.frame == before || enemy.frame == (before + 1) % (MAX_FRAME + 1));
            }
        }

        #[test]
        fn prop_drift_is_monotonic(
            kind in prop_oneof![Just(EnemyKind::Worm), Just(EnemyKind::Ghost)],
            seed in any::<u64>(),
            deltas in prop::collection::vec(0.0f32..100.0, 1..300),
        ) {
            let mut enemy = spawn(kind, seed);
            for dt in deltas {
                let before = enemy.pos.x;
                enemy.update(dt);
                prop_assert!(enemy.pos.x <= before);
            }
        }

        #[test]
        fn prop_mark_is_sticky_and_matches_exit(
            kind in kind_strategy(),
            seed in any::<u64>(),
            deltas in prop::collection::vec(0.0f32..200.0, 1..600),
        ) {
            let mut enemy = spawn(kind, seed);
            let mut was_marked = false;
            for dt in deltas {
                enemy.update(dt);
                if was_marked {
                    prop_assert!(enemy.is_marked());
                }
                was_marked = enemy.is_marked();

                match kind {
                    EnemyKind::Worm | EnemyKind::Ghost => {
                        prop_assert_eq!(enemy.is_marked(), enemy.pos.x < -enemy.width);
                    }
                    EnemyKind::Spider => {
                        prop_assert_eq!(enemy.vx, 0.0);
                        prop_assert_eq!(enemy.is_marked(), enemy.pos.y < -2.0 * enemy.height);
                    }
                }
            }
        }

        #[test]
        fn prop_spider_flips_at_most_once(
            seed in any::<u64>(),
            ticks in 1usize..1500,
        ) {
            let mut spider = spawn(EnemyKind::Spider, seed);
            let mut flips = 0;
            let mut last = 1.0f32;
            for _ in 0..ticks {
                spider.update(16.0);
                if let Motion::Dangle { vy, .. } = spider.motion {
                    if vy.signum() != last.signum() {
                        flips += 1;
                    }
                    last = vy;
                }
            }
            prop_assert!(flips <= 1);
        }
    }
}
