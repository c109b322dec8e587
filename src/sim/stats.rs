//! Session statistics and the finalized result record
//!
//! `SessionStats` accumulates while the session runs and is folded
//! into an immutable `SessionSummary` exactly once, at game over. The
//! clock used for flap cadence is simulated time (ticks / tick rate),
//! which keeps the core deterministic; the wall-clock creation
//! timestamp is attached by the shell when it builds the final
//! `ResultRecord`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::Body;

/// Running totals for one session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// Flap inputs accepted while Running
    pub total_flaps: u32,
    /// Seconds between consecutive flaps, in flap order
    pub flap_intervals: Vec<f32>,
    /// Simulated time of the most recent flap
    pub last_flap_at: Option<f32>,
    /// Body position extremes
    pub min_y: f32,
    pub max_y: f32,
    /// Body velocity extremes
    pub min_v: f32,
    pub max_v: f32,
    /// Obstacles passed (tracks score)
    pub obstacles_cleared: u32,
}

impl SessionStats {
    /// Start accumulating, seeding the extremes from the spawn state
    pub fn new(body: &Body) -> Self {
        Self {
            total_flaps: 0,
            flap_intervals: Vec::new(),
            last_flap_at: None,
            min_y: body.y,
            max_y: body.y,
            min_v: body.v,
            max_v: body.v,
            obstacles_cleared: 0,
        }
    }

    /// Record an accepted flap at the given simulated time
    pub fn record_flap(&mut self, now_secs: f32) {
        self.total_flaps += 1;
        if let Some(last) = self.last_flap_at {
            self.flap_intervals.push(now_secs - last);
        }
        self.last_flap_at = Some(now_secs);
    }

    /// Fold the body's post-step position and velocity into the extremes
    pub fn observe(&mut self, body: &Body) {
        self.min_y = self.min_y.min(body.y);
        self.max_y = self.max_y.max(body.y);
        self.min_v = self.min_v.min(body.v);
        self.max_v = self.max_v.max(body.v);
    }

    pub fn record_cleared(&mut self, count: u32) {
        self.obstacles_cleared += count;
    }

    /// Produce the immutable summary. Zero-flap sessions report 0.0
    /// for both cadence figures.
    pub fn finalize(&self, score: u32, elapsed_secs: f32) -> SessionSummary {
        let fastest = self
            .flap_intervals
            .iter()
            .copied()
            .fold(f32::INFINITY, f32::min);
        let fastest = if fastest.is_finite() { fastest } else { 0.0 };
        let average = if self.flap_intervals.is_empty() {
            0.0
        } else {
            self.flap_intervals.iter().sum::<f32>() / self.flap_intervals.len() as f32
        };

        SessionSummary {
            score,
            total_game_time: f64::from(elapsed_secs),
            total_flaps: self.total_flaps,
            obstacles_cleared: self.obstacles_cleared,
            fastest_flap_interval: f64::from(fastest),
            average_flap_interval: f64::from(average),
            min_y: f64::from(self.min_y),
            max_y: f64::from(self.max_y),
            max_speed: f64::from(self.max_v),
            min_speed: f64::from(self.min_v),
        }
    }
}

/// The finalized, immutable summary of one completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u32,
    pub total_game_time: f64,
    pub total_flaps: u32,
    pub obstacles_cleared: u32,
    pub fastest_flap_interval: f64,
    pub average_flap_interval: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub max_speed: f64,
    pub min_speed: f64,
}

/// One row of the results table: a summary plus who and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub player_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: SessionSummary,
}

impl ResultRecord {
    pub fn new(player_name: String, created_at: DateTime<Utc>, summary: SessionSummary) -> Self {
        Self {
            player_name,
            created_at,
            summary,
        }
    }
}
