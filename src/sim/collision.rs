//! Collision detection and passage scoring
//!
//! Axis-aligned checks against the body's fixed horizontal span: an
//! obstacle kills when it overlaps the body horizontally and the body's
//! vertical extent leaves the gap; the play bounds kill independently.
//! The gap bottom always uses the difficulty's current gap size.

use super::state::{Body, Obstacle};
use crate::consts::*;

/// True if the obstacle's horizontal span overlaps the body's
#[inline]
pub fn overlaps_body(obstacle: &Obstacle) -> bool {
    BODY_X + BODY_WIDTH > obstacle.x && BODY_X < obstacle.right()
}

/// True if the body left the passable gap of an overlapping obstacle
pub fn hits_obstacle(body: &Body, obstacle: &Obstacle, gap_size: f32) -> bool {
    overlaps_body(obstacle)
        && (body.top() < obstacle.gap_y || body.bottom() > obstacle.gap_bottom(gap_size))
}

/// True if the body went off the top of play or into the ground
#[inline]
pub fn hits_bounds(body: &Body) -> bool {
    body.top() < 0.0 || body.bottom() > PLAY_HEIGHT - GROUND_HEIGHT
}

/// Session-ending collision check for one tick
pub fn check(body: &Body, obstacles: &[Obstacle], gap_size: f32) -> bool {
    obstacles.iter().any(|o| hits_obstacle(body, o, gap_size)) || hits_bounds(body)
}

/// Passage test: a point is scored on the tick where the obstacle's
/// trailing edge lands exactly on the body's horizontal position.
/// Positions only ever move in whole-pixel strides, so the equality is
/// exact when the stride divides the offset.
#[inline]
pub fn passed_body(obstacle: &Obstacle) -> bool {
    obstacle.right() == BODY_X
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(y: f32) -> Body {
        Body { y, v: 0.0 }
    }

    #[test]
    fn body_above_gap_collides() {
        // Body extent [50, 74], gap starts at 100: entirely above.
        let body = body_at(50.0);
        let obstacle = Obstacle {
            x: 40.0,
            gap_y: 100.0,
        };
        assert!(check(&body, &[obstacle], 150.0));
    }

    #[test]
    fn body_inside_gap_is_safe() {
        let body = body_at(150.0);
        let obstacle = Obstacle {
            x: 40.0,
            gap_y: 100.0,
        };
        assert!(!check(&body, &[obstacle], 150.0));
    }

    #[test]
    fn body_below_gap_collides() {
        // Gap bottom at 250, body bottom at 254.
        let body = body_at(230.0);
        let obstacle = Obstacle {
            x: 40.0,
            gap_y: 100.0,
        };
        assert!(hits_obstacle(&body, &obstacle, 150.0));
    }

    #[test]
    fn tightened_gap_retroactively_collides() {
        // Safe at the spawn-time gap size, fatal once the ramp has
        // tightened the gap under the same obstacle.
        let body = body_at(230.0);
        let obstacle = Obstacle {
            x: 40.0,
            gap_y: 100.0,
        };
        assert!(!hits_obstacle(&body, &obstacle, 160.0));
        assert!(hits_obstacle(&body, &obstacle, 150.0));
    }

    #[test]
    fn horizontal_overlap_is_exclusive_at_edges() {
        let body = body_at(50.0);
        // Trailing edge exactly at the body's left: no overlap.
        let leaving = Obstacle {
            x: BODY_X - OBSTACLE_WIDTH,
            gap_y: 100.0,
        };
        assert!(!overlaps_body(&leaving));
        assert!(!hits_obstacle(&body, &leaving, 150.0));

        // Leading edge exactly at the body's right: no overlap.
        let arriving = Obstacle {
            x: BODY_X + BODY_WIDTH,
            gap_y: 100.0,
        };
        assert!(!overlaps_body(&arriving));

        let inside = Obstacle {
            x: BODY_X + BODY_WIDTH - 1.0,
            gap_y: 100.0,
        };
        assert!(overlaps_body(&inside));
    }

    #[test]
    fn bounds_kill_off_top_and_in_ground() {
        assert!(hits_bounds(&body_at(-0.5)));
        assert!(!hits_bounds(&body_at(0.0)));

        // Ground line at 500: bottom exactly on it is safe.
        let ground = PLAY_HEIGHT - GROUND_HEIGHT;
        assert!(!hits_bounds(&body_at(ground - BODY_HEIGHT)));
        assert!(hits_bounds(&body_at(ground - BODY_HEIGHT + 0.5)));
    }

    #[test]
    fn passage_requires_exact_alignment() {
        let scoring = Obstacle {
            x: BODY_X - OBSTACLE_WIDTH,
            gap_y: 100.0,
        };
        assert!(passed_body(&scoring));

        let near = Obstacle {
            x: BODY_X - OBSTACLE_WIDTH + 1.5,
            gap_y: 100.0,
        };
        assert!(!passed_body(&near));
    }
}
