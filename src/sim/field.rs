//! Obstacle field: spawning, advancement and retirement
//!
//! Spawning is schedule-driven (primary obstacles on the spawn
//! interval, a secondary pair-obstacle on every second interval) and
//! gap placement is constrained so consecutive gaps never jump by more
//! than 70% of the current gap size. The RNG comes in from the session
//! aggregate, so tests can pin exact obstacle sequences by seed.

use rand::Rng;
use rand_pcg::Pcg32;

use super::difficulty::Difficulty;
use super::state::Obstacle;
use crate::consts::*;

/// Advance the field by one tick: spawn, move, retire.
///
/// Must be called exactly once per Running tick, with the tick count
/// *before* this tick's increment.
pub fn advance(
    obstacles: &mut Vec<Obstacle>,
    rng: &mut Pcg32,
    tick_count: u64,
    difficulty: &Difficulty,
) {
    let interval = u64::from(difficulty.spawn_interval);

    if tick_count % interval == 0 {
        let gap_y = pick_gap_y(obstacles.last(), difficulty.gap_size, rng);
        obstacles.push(Obstacle {
            x: PLAY_WIDTH,
            gap_y,
        });
    }

    // Secondary obstacle, spawned ahead of the play area for a denser
    // pair. On a shared tick it anchors to the primary just appended.
    if tick_count % (2 * interval) == 0 && tick_count > 0 {
        let gap_y = pick_gap_y(obstacles.last(), difficulty.gap_size, rng);
        obstacles.push(Obstacle {
            x: PLAY_WIDTH + PLAY_WIDTH / 2.0,
            gap_y,
        });
    }

    for obstacle in obstacles.iter_mut() {
        obstacle.x -= difficulty.speed as f32;
    }

    obstacles.retain(|o| o.x >= -OBSTACLE_WIDTH);
}

/// Choose a gap top for a new obstacle.
///
/// Uniform over the legal range, narrowed to within 70% of the gap
/// size of the most recently appended obstacle's gap when one exists.
/// A result outside the legal range would mean a generation bug, not
/// bad data, so it asserts.
fn pick_gap_y(prev: Option<&Obstacle>, gap_size: f32, rng: &mut Pcg32) -> f32 {
    let floor = GAP_MARGIN as i32;
    let ceil = (PLAY_HEIGHT - GROUND_HEIGHT - GAP_MARGIN - gap_size) as i32;

    let (lo, hi) = match prev {
        Some(prev) => {
            let max_delta = (0.7 * gap_size) as i32;
            let anchor = prev.gap_y as i32;
            ((anchor - max_delta).max(floor), (anchor + max_delta).min(ceil))
        }
        None => (floor, ceil),
    };
    assert!(lo <= hi, "gap window collapsed: [{lo}, {hi}]");

    let gap_y = rng.random_range(lo..=hi);
    assert!(
        (floor..=ceil).contains(&gap_y),
        "gap top {gap_y} outside legal range [{floor}, {ceil}]"
    );
    gap_y as f32
}
