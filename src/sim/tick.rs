//! Variable timestep simulation tick
//!
//! Spawns on a fixed cadence, culls flagged enemies, then updates every
//! enemy that is still in the scene.

use super::state::Scene;
use crate::settings::CullPolicy;

/// Advance the scene by `dt` milliseconds
///
/// The delta of a spawning tick is discarded: the timer restarts at 0.
pub fn tick(scene: &mut Scene, dt: f32) {
    scene.ticks += 1;
    scene.elapsed_ms += dt as f64;

    scene.spawn_timer += dt;
    if scene.spawn_timer > scene.spawn_interval() {
        scene.spawn_enemy();
        scene.spawn_timer = 0.0;

        // Piggyback on the spawn cadence instead of scanning every tick
        if scene.cull_policy() == CullPolicy::OnSpawn {
            scene.cull();
        }
    }

    if scene.cull_policy() == CullPolicy::EveryTick {
        scene.cull();
    }

    // Flagged enemies still update until they are culled
    for enemy in &mut scene.enemies {
        enemy.update(dt);
    }
}
