//! Error types
//!
//! The simulation itself cannot fail once constructed. Errors only come from
//! bad configuration and from the drawing surface.

/// Result alias for scene construction
pub type SceneResult<T> = Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("canvas {axis} must be positive and finite, got {value}")]
    InvalidDimension { axis: &'static str, value: f32 },

    #[error("spawn interval must be positive and finite, got {0} ms")]
    InvalidSpawnInterval(f32),

    #[error("at least one enemy kind must be eligible for spawning")]
    NoEligibleKinds,

    #[error("delta clamp must be positive and finite, got {0} ms")]
    InvalidDeltaClamp(f32),

    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("surface rejected draw call: {0}")]
    Surface(String),

    #[error("restore() called with no saved state")]
    UnbalancedRestore,
}
