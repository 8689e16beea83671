//! Scene state
//!
//! Everything needed to resume a scene deterministically lives here,
//! including the RNG.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, EnemyKind};
use crate::error::{DrawError, SceneResult};
use crate::renderer::{Surface, draw_scene};
use crate::settings::{CullPolicy, SceneConfig};

/// Canvas bounds, copied into spawn routines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

/// Running totals for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneStats {
    pub spawned: u64,
    pub culled: u64,
}

/// The whole simulation (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    config: SceneConfig,
    /// Live enemies; insertion order is draw order
    pub(crate) enemies: Vec<Enemy>,
    /// Milliseconds accumulated since the last spawn
    pub(crate) spawn_timer: f32,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub(crate) ticks: u64,
    /// Total simulated milliseconds
    pub(crate) elapsed_ms: f64,
    pub(crate) stats: SceneStats,
    next_id: u32,
}

impl Scene {
    /// Build a scene and spawn the first enemy
    pub fn new(config: SceneConfig) -> SceneResult<Self> {
        config.validate()?;

        let mut scene = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            enemies: Vec::new(),
            spawn_timer: 0.0,
            ticks: 0,
            elapsed_ms: 0.0,
            stats: SceneStats::default(),
            next_id: 1,
        };
        scene.spawn_enemy();

        log::info!(
            "Scene {}x{} seeded with {}",
            scene.config.width,
            scene.config.height,
            scene.config.seed
        );
        Ok(scene)
    }

    /// Advance by `dt` milliseconds
    pub fn update(&mut self, dt: f32) {
        super::tick::tick(self, dt);
    }

    /// Draw all enemies in insertion order
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), DrawError> {
        draw_scene(self, surface)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            width: self.config.width,
            height: self.config.height,
        }
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    pub fn spawn_interval(&self) -> f32 {
        self.config.spawn_interval_ms
    }

    pub fn cull_policy(&self) -> CullPolicy {
        self.config.cull_policy
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    /// Enemies flagged but not yet culled
    pub fn flagged_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_marked()).count()
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Append one enemy of a uniformly chosen eligible kind
    pub(super) fn spawn_enemy(&mut self) {
        // Config validation guarantees at least one kind
        let idx = self.rng.random_range(0..self.config.kinds.len());
        let kind: EnemyKind = self.config.kinds[idx];
        let id = self.next_entity_id();
        let bounds = self.bounds();
        let enemy = Enemy::spawn(kind, id, bounds, &mut self.rng);
        log::debug!("Spawned {} #{} at {:?}", kind.as_str(), id, enemy.pos);
        self.enemies.push(enemy);
        self.stats.spawned += 1;
    }

    /// Drop flagged enemies, keeping order. Returns how many were removed.
    pub(super) fn cull(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.is_marked());
        let removed = before - self.enemies.len();
        if removed > 0 {
            log::debug!("Culled {} enemies, {} remain", removed, self.enemies.len());
        }
        self.stats.culled += removed as u64;
        removed
    }

    /// Serialize the full scene, RNG included
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a scene saved with [`Scene::to_json`]
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let scene: Self = serde_json::from_str(json)?;
        scene.config.validate()?;
        Ok(scene)
    }
}

/// Count of enemies per kind, in [`EnemyKind::ALL`] order
pub fn census(enemies: &[Enemy]) -> [usize; 3] {
    let mut counts = [0; 3];
    for enemy in enemies {
        counts[enemy.kind.index()] += 1;
    }
    counts
}
