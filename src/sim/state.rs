//! Game state and core simulation types
//!
//! The session aggregate owns everything that varies during play,
//! including the RNG, so a whole session is reproducible from one seed
//! and a restart is a plain value replacement rather than an in-place
//! field-by-field reset.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::stats::{SessionStats, SessionSummary};
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Idle on the title screen, waiting for the begin signal
    Start,
    /// Fixed, non-interactive delay before play
    Countdown,
    /// Physics, obstacles, collision and scoring active
    Running,
    /// Simulation frozen, waiting for restart or a results reset
    GameOver,
}

/// Events the shell reacts to; drained once per tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Emitted exactly once, at the Running -> GameOver transition
    SessionEnded(SessionSummary),
    /// The player confirmed wiping the persisted results
    ResetConfirmed,
}

/// The controlled body. Horizontal position is fixed at `BODY_X`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Vertical position (top edge)
    pub y: f32,
    /// Vertical velocity, positive downward
    pub v: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            y: PLAY_HEIGHT / 2.0,
            v: 0.0,
        }
    }
}

impl Body {
    /// Advance the body by one tick.
    ///
    /// A flap replaces the velocity with the fixed impulse and is
    /// recorded in the session stats; either way the unconditional
    /// velocity-then-position integration runs afterward, so motion is
    /// deterministic for a given input sequence. There is no terminal
    /// velocity: collision and bounds checks are the only stop.
    pub fn step(&mut self, flapped: bool, stats: &mut SessionStats, now_secs: f32) {
        if flapped {
            self.v = FLAP_IMPULSE;
            stats.record_flap(now_secs);
        }
        self.v += GRAVITY;
        self.y += self.v;
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + BODY_HEIGHT
    }
}

/// A vertical barrier pair with a passable gap
///
/// Only the gap top is stored; the gap bottom is derived from the
/// difficulty's *current* gap size, so already-spawned obstacles
/// tighten as the ramp progresses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge, decreases every tick
    pub x: f32,
    /// Top of the passable gap
    pub gap_y: f32,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    #[inline]
    pub fn gap_bottom(&self, gap_size: f32) -> f32 {
        self.gap_y + gap_size
    }
}

/// Complete session state, mutated only by [`tick`](super::tick::tick)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed, for reproducing a run
    pub seed: u64,
    /// Session RNG; the only source of randomness in the simulation
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation ticks elapsed while Running
    pub tick_count: u64,
    /// Ticks left in the countdown
    pub countdown_ticks: u32,
    /// Obstacles passed
    pub score: u32,
    /// The controlled body
    pub body: Body,
    /// Obstacles in spawn order (which is also horizontal order)
    pub obstacles: Vec<Obstacle>,
    /// Running session statistics
    pub stats: SessionStats,
    /// The GameOver reset-confirmation dialog is open
    pub reset_prompt: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session from a seed
    pub fn new(seed: u64) -> Self {
        let body = Body::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            tick_count: 0,
            countdown_ticks: 0,
            score: 0,
            body,
            obstacles: Vec::new(),
            stats: SessionStats::new(&body),
            reset_prompt: false,
            events: Vec::new(),
        }
    }

    /// Replace this session with a fresh one.
    ///
    /// The next seed is drawn from the current RNG, so a multi-session
    /// run stays a pure function of the initial seed.
    pub fn restart(&mut self) {
        let next_seed = self.rng.random::<u64>();
        *self = Self::new(next_seed);
    }

    /// Seconds of simulated time elapsed while Running
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.tick_count as f32 / TICK_RATE as f32
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events emitted since the last drain
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
