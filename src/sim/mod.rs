//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the session aggregate
//! - No rendering, persistence or platform dependencies
//!
//! The shell drives it with one [`tick`] per frame and reads state
//! snapshots back; everything the outside world must react to arrives
//! as a [`GameEvent`].

pub mod collision;
pub mod difficulty;
pub mod field;
pub mod state;
pub mod stats;
pub mod tick;

pub use difficulty::Difficulty;
pub use state::{Body, GameEvent, GamePhase, GameState, Obstacle};
pub use stats::{ResultRecord, SessionStats, SessionSummary};
pub use tick::{TickInput, tick};
