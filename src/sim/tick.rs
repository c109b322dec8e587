//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one tick: the phase
//! machine (Start -> Countdown -> Running -> GameOver), and while
//! Running the full pipeline in a fixed order - difficulty, body
//! step, obstacle spawn/advance/retire, collision, stat extremes,
//! scoring. Out-of-phase intents are ignored, never errors.

use super::collision;
use super::difficulty::Difficulty;
use super::field;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input intents for a single tick.
///
/// The shell collapses however many key events arrived during the
/// frame into at most one of each intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Upward impulse (Running only)
    pub flap: bool,
    /// Begin signal on the title screen
    pub begin: bool,
    /// Start a new session (GameOver only)
    pub restart: bool,
    /// Open the persisted-results reset dialog (GameOver only)
    pub reset_request: bool,
    /// Answer the reset dialog
    pub reset_confirm: bool,
    pub reset_cancel: bool,
    /// Immediate exit; consumed by the shell, never by `tick`
    pub quit: bool,
}

/// Advance the session by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Start => {
            if input.begin {
                state.countdown_ticks = COUNTDOWN_TICKS;
                state.phase = GamePhase::Countdown;
                log::info!("session {:#x} counting down", state.seed);
            }
        }
        GamePhase::Countdown => {
            state.countdown_ticks = state.countdown_ticks.saturating_sub(1);
            if state.countdown_ticks == 0 {
                state.phase = GamePhase::Running;
            }
        }
        GamePhase::Running => running_tick(state, input),
        GamePhase::GameOver => game_over_tick(state, input),
    }
}

fn running_tick(state: &mut GameState, input: &TickInput) {
    let difficulty = Difficulty::at(state.tick_count);
    let now = state.elapsed_secs();

    state.body.step(input.flap, &mut state.stats, now);

    field::advance(
        &mut state.obstacles,
        &mut state.rng,
        state.tick_count,
        &difficulty,
    );

    let dead = collision::check(&state.body, &state.obstacles, difficulty.gap_size);

    // The death tick still finishes its bookkeeping before the freeze,
    // so the final record includes this tick's extremes and passes.
    state.stats.observe(&state.body);

    let cleared = state
        .obstacles
        .iter()
        .filter(|o| collision::passed_body(o))
        .count() as u32;
    state.score += cleared;
    state.stats.record_cleared(cleared);

    state.tick_count += 1;

    if dead {
        state.phase = GamePhase::GameOver;
        let summary = state.stats.finalize(state.score, state.elapsed_secs());
        log::info!(
            "game over: score {} after {:.1}s, {} flaps",
            summary.score,
            summary.total_game_time,
            summary.total_flaps
        );
        state.push_event(GameEvent::SessionEnded(summary));
    }
}

fn game_over_tick(state: &mut GameState, input: &TickInput) {
    // The reset dialog is modal: until it is answered, every other
    // intent waits.
    if state.reset_prompt {
        if input.reset_confirm {
            state.reset_prompt = false;
            state.push_event(GameEvent::ResetConfirmed);
            log::info!("results reset confirmed");
        } else if input.reset_cancel {
            state.reset_prompt = false;
        }
        return;
    }

    if input.reset_request {
        state.reset_prompt = true;
        return;
    }

    if input.restart {
        state.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    const FLAP: TickInput = TickInput {
        flap: true,
        begin: false,
        restart: false,
        reset_request: false,
        reset_confirm: false,
        reset_cancel: false,
        quit: false,
    };

    fn begin() -> TickInput {
        TickInput {
            begin: true,
            ..Default::default()
        }
    }

    /// A session already in Running, with the countdown skipped
    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn begin_runs_the_countdown_into_running() {
        let mut state = GameState::new(1);
        tick(&mut state, &begin());
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.countdown_ticks, COUNTDOWN_TICKS);

        for _ in 0..COUNTDOWN_TICKS - 1 {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.phase, GamePhase::Countdown);
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Running);
        // No simulation time passed yet
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn flap_is_ignored_outside_running() {
        let mut state = GameState::new(2);
        tick(&mut state, &FLAP);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.stats.total_flaps, 0);

        tick(&mut state, &begin());
        tick(&mut state, &FLAP); // countdown is non-interactive
        assert_eq!(state.stats.total_flaps, 0);
        assert_eq!(state.body.v, 0.0);
    }

    #[test]
    fn restart_is_ignored_outside_game_over() {
        let mut state = running_state(3);
        tick(&mut state, &TickInput::default());
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.tick_count, 2);
    }

    #[test]
    fn ground_collision_ends_the_session_once() {
        let mut state = running_state(4);
        state.body.y = PLAY_HEIGHT; // well below the ground line

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        let events = state.take_events();
        assert_eq!(events.len(), 1);
        let GameEvent::SessionEnded(summary) = &events[0] else {
            panic!("expected SessionEnded, got {events:?}");
        };
        assert_eq!(summary.score, 0);
        // Death tick counted before the freeze
        assert!((summary.total_game_time - 1.0 / 60.0).abs() < 1e-6);

        // Frozen: no further ticks, no further events
        tick(&mut state, &TickInput::default());
        assert_eq!(state.tick_count, 1);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn passage_scores_exactly_on_alignment() {
        let mut state = running_state(5);
        state.tick_count = 1; // off the spawn schedule
        // One stride (speed 3) before exact trailing-edge alignment.
        state.obstacles.push(Obstacle {
            x: BODY_X - OBSTACLE_WIDTH + 3.0,
            gap_y: 100.0,
        });

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
        assert_eq!(state.stats.obstacles_cleared, 1);
        assert_eq!(state.phase, GamePhase::Running);

        // Already past the body; never scores again.
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn flap_records_cadence_while_running() {
        let mut state = running_state(6);
        state.body.y = 200.0; // room to fall during the pause
        tick(&mut state, &FLAP);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        tick(&mut state, &FLAP);

        assert_eq!(state.stats.total_flaps, 2);
        assert_eq!(state.stats.flap_intervals.len(), 1);
        // 31 ticks apart at 60 ticks/s
        assert!((state.stats.flap_intervals[0] - 31.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn reset_dialog_is_gated_and_modal() {
        let mut state = running_state(7);
        state.body.y = PLAY_HEIGHT;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        state.take_events();

        // Confirm without an open dialog does nothing.
        let confirm = TickInput {
            reset_confirm: true,
            ..Default::default()
        };
        tick(&mut state, &confirm);
        assert!(state.take_events().is_empty());

        let request = TickInput {
            reset_request: true,
            ..Default::default()
        };
        tick(&mut state, &request);
        assert!(state.reset_prompt);

        // Restart waits while the dialog is open.
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.reset_prompt);

        tick(&mut state, &confirm);
        assert!(!state.reset_prompt);
        assert_eq!(state.take_events(), vec![GameEvent::ResetConfirmed]);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Cancel path emits nothing.
        tick(&mut state, &request);
        let cancel = TickInput {
            reset_cancel: true,
            ..Default::default()
        };
        tick(&mut state, &cancel);
        assert!(!state.reset_prompt);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn restart_from_game_over_returns_to_start() {
        let mut state = running_state(8);
        state.body.y = PLAY_HEIGHT;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_ne!(state.seed, 8);
    }

    #[test]
    fn same_seed_and_inputs_replay_identically() {
        let mut a = GameState::new(0xfeed);
        let mut b = GameState::new(0xfeed);

        let script = |t: u64| TickInput {
            begin: t == 0,
            flap: t > COUNTDOWN_TICKS as u64 && t % 23 == 0,
            ..Default::default()
        };

        for t in 0..2_000 {
            let input = script(t);
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.tick_count, b.tick_count);
        assert_eq!(a.score, b.score);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.body, b.body);
        assert_eq!(a.stats, b.stats);
    }
}
