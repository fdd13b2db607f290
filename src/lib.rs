//! Space War - a single-screen arcade dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacles, collisions, motion, game state)
//! - `audio`: Background music / one-shot cue dispatch
//! - `overlay`: Pause and game-over screen interface
//! - `highscores`: Best-score record on top of a key-value store
//! - `persistence`: Key-value storage backends
//! - `settings`: Player preferences

pub mod audio;
pub mod highscores;
pub mod overlay;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, AudioState, Clip, Track};
pub use highscores::{HighScoreStore, Record};
pub use overlay::Overlay;
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz, the host frame rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ship travel speed (units/s)
    pub const SHIP_SPEED: f32 = 250.0;
    /// Bank angle while travelling (radians)
    pub const LEAN_ANGLE: f32 = 0.5;
    /// Background moves to -target / PARALLAX_DIVISOR
    pub const PARALLAX_DIVISOR: f32 = 50.0;
    /// Ship sprite size before scaling
    pub const SHIP_SPRITE_SIZE: Vec2 = Vec2::new(120.0, 160.0);
    /// Ship sprite scale
    pub const SHIP_SCALE: f32 = 0.4;

    /// Mean delay between spawns (s)
    pub const SPAWN_INTERVAL: f32 = 1.0;
    /// Spawn delay jitter, delay is drawn from interval ± jitter
    pub const SPAWN_JITTER: f32 = 0.5;
    /// Spawn X is an integer drawn from [0, SPAWN_LANE_WIDTH)
    pub const SPAWN_LANE_WIDTH: u32 = 16;
    /// Obstacle scale = step / 10 + 1 with step in [0, SCALE_STEPS)
    pub const SCALE_STEPS: u32 = 6;
    /// Angular velocity = uniform(-1, 1) * SPIN_SCALE (rad/s)
    pub const SPIN_SCALE: f32 = 3.0;
    /// Horizontal drift = uniform(-1, 1) * DRIFT_SCALE (units/s)
    pub const DRIFT_SCALE: f32 = 100.0;
    /// Asteroid sprite size before scaling
    pub const OBSTACLE_SPRITE_SIZE: Vec2 = Vec2::new(48.0, 48.0);
    /// Downward acceleration applied to obstacles (units/s²)
    pub const GRAVITY: f32 = 120.0;
    /// Bounciness of obstacle/obstacle collisions
    pub const RESTITUTION: f32 = 0.2;

    /// Background music volume
    pub const MUSIC_VOLUME: f32 = 0.2;
    /// Overlay fade in/out duration (s)
    pub const OVERLAY_FADE_SECS: f32 = 0.5;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    ((b.x - a.x) * (b.x - a.x) + (b.y - a.y) * (b.y - a.y)).sqrt()
}

/// Seconds needed to cover `distance` at `speed`
#[inline]
pub fn travel_time(distance: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return 0.0;
    }
    distance / speed
}
