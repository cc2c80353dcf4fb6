//! Bouncing Balls - balls in a box under gravity
//!
//! Core modules:
//! - `sim`: Physics stepper (ball creation, per-tick update, owned state)
//! - `playback`: Running/Paused control and frame request bookkeeping
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Native frame ticker
//! - `settings`: Layered configuration (defaults, LocalStorage, URL query)

pub mod platform;
pub mod playback;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use playback::{Animator, FrameOutcome, FrameToken, PlaybackState};
pub use settings::{ResizePolicy, Settings};

/// Simulation constants
pub mod consts {
    /// Downward acceleration added to vy every tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.3;
    /// Multiplier on the reversed velocity component after a wall hit
    pub const RESTITUTION: f32 = 0.98;
    /// Multiplier on both velocity components every tick
    pub const DAMPING: f32 = 0.999;

    /// Distance from each wall inside which new balls never spawn
    pub const SPAWN_MARGIN: f32 = 20.0;
    /// Spawn speed range per axis is [-MAX_SPAWN_SPEED, MAX_SPAWN_SPEED)
    pub const MAX_SPAWN_SPEED: f32 = 4.0;
    /// Ball radius range [MIN_RADIUS, MAX_RADIUS)
    pub const MIN_RADIUS: f32 = 10.0;
    pub const MAX_RADIUS: f32 = 25.0;

    /// Upper bound on the configured initial ball count
    pub const MAX_INITIAL_BALLS: usize = 500;
}
