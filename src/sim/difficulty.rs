//! Time-based difficulty ramp
//!
//! A pure step function of elapsed ticks: every ten simulated seconds
//! the obstacle speed rises, the spawn interval shrinks and the gap
//! tightens, each clamped at its limit. Between steps the values hold
//! constant, so evaluating the closed form every tick is observably
//! identical to mutating the triple once per step.

use crate::consts::*;

/// The (speed, spawn interval, gap size) triple for some tick count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Horizontal obstacle speed, px/tick, capped at `MAX_SPEED`
    pub speed: i32,
    /// Ticks between primary spawns, floored at `MIN_SPAWN_INTERVAL`
    pub spawn_interval: u32,
    /// Vertical gap opening, floored at `MIN_GAP_SIZE`
    pub gap_size: f32,
}

impl Difficulty {
    /// Difficulty in effect at the given tick count.
    ///
    /// Monotonic in the "harder" direction only: speed never
    /// decreases, spawn interval and gap size never increase.
    pub fn at(tick_count: u64) -> Self {
        let steps = tick_count / DIFFICULTY_STEP_TICKS;
        let speed = (BASE_SPEED as u64 + steps).min(MAX_SPEED as u64) as i32;
        let spawn_interval = (BASE_SPAWN_INTERVAL as u64)
            .saturating_sub(steps * 10)
            .max(MIN_SPAWN_INTERVAL as u64) as u32;
        let gap_size = (BASE_GAP_SIZE - 10.0 * steps as f32).max(MIN_GAP_SIZE);
        Self {
            speed,
            spawn_interval,
            gap_size,
        }
    }
}
