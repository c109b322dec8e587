//! Gapwing - a terminal flap-through-the-gap arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle field, game state)
//! - `ui`: Crossterm terminal rendering and input
//! - `persistence`: Session results store (PostgreSQL, best-effort)
//! - `settings`: Player preferences

pub mod persistence;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second
    pub const TICK_RATE: u32 = 60;

    /// Play area dimensions (pixels)
    pub const PLAY_WIDTH: f32 = 400.0;
    pub const PLAY_HEIGHT: f32 = 600.0;
    /// Ground band at the bottom of the play area
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Controlled body extents; horizontal position is fixed
    pub const BODY_WIDTH: f32 = 34.0;
    pub const BODY_HEIGHT: f32 = 24.0;
    pub const BODY_X: f32 = 50.0;

    /// Obstacle column width
    pub const OBSTACLE_WIDTH: f32 = 52.0;

    /// Vertical acceleration per tick
    pub const GRAVITY: f32 = 0.25;
    /// Upward impulse velocity applied on a flap
    pub const FLAP_IMPULSE: f32 = -5.0;

    /// Gap tops never come closer than this to the ceiling or the ground
    pub const GAP_MARGIN: f32 = 100.0;

    /// Difficulty ramp: starting values and hard limits
    pub const BASE_SPEED: i32 = 3;
    pub const MAX_SPEED: i32 = 10;
    pub const BASE_SPAWN_INTERVAL: u32 = 90;
    pub const MIN_SPAWN_INTERVAL: u32 = 50;
    pub const BASE_GAP_SIZE: f32 = 150.0;
    pub const MIN_GAP_SIZE: f32 = 110.0;
    /// The ramp tightens once per this many ticks (10 seconds)
    pub const DIFFICULTY_STEP_TICKS: u64 = TICK_RATE as u64 * 10;

    /// Countdown shows 3 / 2 / 1 / Go!, 0.7 s per step
    pub const COUNTDOWN_STEP_TICKS: u32 = 42;
    pub const COUNTDOWN_TICKS: u32 = 4 * COUNTDOWN_STEP_TICKS;
}
