//! Gapwing entry point
//!
//! Wires the deterministic simulation to the terminal shell and the
//! results store, then runs the fixed 60 Hz tick loop: poll input,
//! tick, dispatch events, draw, sleep the frame remainder.

use std::io;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::Utc;

use gapwing::consts::TICK_RATE;
use gapwing::persistence::Persistence;
use gapwing::settings::Settings;
use gapwing::sim::{Difficulty, GameEvent, GameState, ResultRecord, tick};
use gapwing::ui;

fn main() -> io::Result<()> {
    env_logger::init();
    if dotenvy::dotenv().is_ok() {
        log::debug!("loaded environment from .env");
    }

    let mut settings = Settings::load();
    let player_name = ui::prompt_player_name(settings.player_name.as_deref())?;
    if settings.player_name.as_deref() != Some(player_name.as_str()) {
        settings.player_name = Some(player_name.clone());
        settings.save();
    }

    let persistence = Persistence::connect_from_env();

    let seed = settings.seed.unwrap_or_else(seed_from_time);
    log::info!("starting with seed {seed:#x} for {player_name}");

    let mut ctx = ui::Context::init()?;
    let mut state = GameState::new(seed);

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(TICK_RATE));
    let mut fps_counter = 0u32;
    let mut fps = TICK_RATE;
    let mut fps_window = Instant::now();

    loop {
        let frame_start = Instant::now();

        let input = ui::poll_input()?;
        if input.quit {
            break;
        }

        tick(&mut state, &input);

        for event in state.take_events() {
            match event {
                GameEvent::SessionEnded(summary) => {
                    let record = ResultRecord::new(player_name.clone(), Utc::now(), summary);
                    persistence.save(record);
                }
                GameEvent::ResetConfirmed => persistence.reset(),
            }
        }

        let difficulty = Difficulty::at(state.tick_count);
        let show_fps = settings.show_fps.then_some(fps);
        ui::draw(&mut ctx, &state, &difficulty, &player_name, show_fps)?;

        fps_counter += 1;
        if fps_window.elapsed() >= Duration::from_secs(1) {
            fps = fps_counter;
            fps_counter = 0;
            fps_window = Instant::now();
        }

        let elapsed = frame_start.elapsed();
        if elapsed < tick_duration {
            thread::sleep(tick_duration - elapsed);
        }
    }

    ctx.teardown()
}

/// Wall-clock-derived seed for ordinary (non-replay) sessions
fn seed_from_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
