//! Scene configuration
//!
//! Persisted as JSON in LocalStorage on web; read from a file on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SceneResult};
use crate::sim::EnemyKind;

/// When flagged enemies are dropped from the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CullPolicy {
    /// Only on ticks that spawn a new enemy (cheap, flagged enemies linger)
    #[default]
    OnSpawn,
    /// Every tick, before enemies update
    EveryTick,
}

impl CullPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CullPolicy::OnSpawn => "OnSpawn",
            CullPolicy::EveryTick => "EveryTick",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "onspawn" | "on_spawn" | "spawn" => Some(CullPolicy::OnSpawn),
            "everytick" | "every_tick" | "tick" => Some(CullPolicy::EveryTick),
            _ => None,
        }
    }
}

/// Scene parameters, fixed once the scene is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Canvas width in pixels
    pub width: f32,
    /// Canvas height in pixels
    pub height: f32,
    /// Milliseconds between spawns
    pub spawn_interval_ms: f32,
    /// RNG seed for reproducible runs
    pub seed: u64,
    /// Kinds the spawner picks from (uniformly)
    pub kinds: Vec<EnemyKind>,
    /// Culling cadence
    pub cull_policy: CullPolicy,
    /// Upper bound on a single frame delta (None = unclamped)
    pub max_delta_ms: Option<f32>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            seed: 0,
            kinds: EnemyKind::ALL.to_vec(),
            cull_policy: CullPolicy::OnSpawn,
            max_delta_ms: None,
        }
    }
}

impl SceneConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_spawn_interval(mut self, interval_ms: f32) -> Self {
        self.spawn_interval_ms = interval_ms;
        self
    }

    pub fn with_kinds(mut self, kinds: &[EnemyKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn with_cull_policy(mut self, policy: CullPolicy) -> Self {
        self.cull_policy = policy;
        self
    }

    pub fn with_max_delta(mut self, max_delta_ms: Option<f32>) -> Self {
        self.max_delta_ms = max_delta_ms;
        self
    }

    /// Reject configs the simulation can't run with
    pub fn validate(&self) -> SceneResult<()> {
        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidDimension { axis, value });
            }
        }
        if !(self.spawn_interval_ms.is_finite() && self.spawn_interval_ms > 0.0) {
            return Err(ConfigError::InvalidSpawnInterval(self.spawn_interval_ms));
        }
        if self.kinds.is_empty() {
            return Err(ConfigError::NoEligibleKinds);
        }
        if let Some(max) = self.max_delta_ms {
            if !(max.is_finite() && max > 0.0) {
                return Err(ConfigError::InvalidDeltaClamp(max));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "night_parade_config";

    /// Environment variable naming a JSON config file (native)
    #[allow(dead_code)]
    const CONFIG_ENV: &'static str = "NIGHT_PARADE_CONFIG";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded scene config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default scene config");
        Self::default()
    }

    /// Load config from the file named by `NIGHT_PARADE_CONFIG` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::CONFIG_ENV) else {
            log::info!("Using default scene config");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded scene config from {}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring config {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read config {}: {}", path, e);
                Self::default()
            }
        }
    }
}
