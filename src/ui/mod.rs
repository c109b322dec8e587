//! Crossterm terminal shell
//!
//! Renders read-only snapshots of the simulation onto a fixed
//! character grid and turns key presses into per-tick intents. Nothing
//! in here mutates core state; the `Context` owns the terminal modes
//! with an explicit init/teardown lifecycle (teardown also runs on
//! drop, so a panic still restores the terminal).

use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, queue,
    style::{self, Color},
    terminal,
};

use crate::consts::*;
use crate::sim::{Difficulty, GamePhase, GameState, TickInput};

/// Player names are capped at this many characters
pub const MAX_NAME_LEN: usize = 20;

/// Character cells across the play area (8 px per cell)
const COLS: usize = 50;
/// Character cells down the play area (20 px per cell)
const ROWS: usize = 30;

const CELL_W: f32 = PLAY_WIDTH / COLS as f32;
const CELL_H: f32 = PLAY_HEIGHT / ROWS as f32;

/// Terminal context with explicit lifecycle
pub struct Context {
    out: Stdout,
    active: bool,
}

impl Context {
    /// Enter raw mode and the alternate screen
    pub fn init() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;
        Ok(Self { out, active: true })
    }

    /// Restore the terminal. Safe to call twice.
    pub fn teardown(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            execute!(self.out, terminal::LeaveAlternateScreen, cursor::Show)?;
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}

/// Drain all pending key events into one tick's intents.
///
/// Repeated presses of the same key within a frame collapse into a
/// single intent.
pub fn poll_input() -> io::Result<TickInput> {
    let mut input = TickInput::default();
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char(' ') => {
                    input.flap = true;
                    input.begin = true;
                }
                KeyCode::Char('r') | KeyCode::Char('R') => input.restart = true,
                KeyCode::Delete => input.reset_request = true,
                KeyCode::Char('y') | KeyCode::Char('Y') => input.reset_confirm = true,
                KeyCode::Char('n') | KeyCode::Char('N') => input.reset_cancel = true,
                KeyCode::Char('q') | KeyCode::Esc => input.quit = true,
                _ => {}
            }
        }
    }
    Ok(input)
}

/// Prompt for a player name on the plain (pre-raw-mode) terminal.
/// Non-empty, trimmed, capped at [`MAX_NAME_LEN`] characters.
pub fn prompt_player_name(default: Option<&str>) -> io::Result<String> {
    let mut line = String::new();
    loop {
        match default {
            Some(name) => print!("Enter your player name [{name}]: "),
            None => print!("Enter your player name: "),
        }
        io::stdout().flush()?;

        line.clear();
        io::stdin().read_line(&mut line)?;
        let name = line.trim();
        if name.is_empty() {
            if let Some(name) = default {
                return Ok(name.to_string());
            }
            continue;
        }
        return Ok(name.chars().take(MAX_NAME_LEN).collect());
    }
}

/// Render one frame
pub fn draw(
    ctx: &mut Context,
    state: &GameState,
    difficulty: &Difficulty,
    player_name: &str,
    fps: Option<u32>,
) -> io::Result<()> {
    let mut grid = [[' '; COLS]; ROWS];

    draw_ground(&mut grid);
    for obstacle in &state.obstacles {
        draw_obstacle(&mut grid, obstacle.x, obstacle.gap_y, difficulty.gap_size);
    }
    draw_body(&mut grid, state.body.y);

    blit(&mut grid, 0, 1, &format!("Score: {}", state.score));
    if let Some(fps) = fps {
        let label = format!("{fps} fps");
        blit(&mut grid, 0, COLS - label.len() - 1, &label);
    }

    match state.phase {
        GamePhase::Start => {
            blit_centered(&mut grid, 8, "G A P W I N G");
            blit_centered(&mut grid, 11, "SPACE = flap");
            blit_centered(&mut grid, 12, "R = restart (after game over)");
            blit_centered(&mut grid, 13, "DEL = reset saved results");
            blit_centered(&mut grid, 16, &format!("Player: {player_name}"));
            blit_centered(&mut grid, 19, "Press SPACE to start");
        }
        GamePhase::Countdown => {
            let elapsed = COUNTDOWN_TICKS - state.countdown_ticks;
            let step = (elapsed / COUNTDOWN_STEP_TICKS).min(3) as usize;
            blit_centered(&mut grid, 14, ["3", "2", "1", "Go!"][step]);
        }
        GamePhase::Running => {}
        GamePhase::GameOver => {
            if state.reset_prompt {
                blit_centered(&mut grid, 13, "Reset all saved results?");
                blit_centered(&mut grid, 15, "Y = confirm, N = cancel");
            } else {
                blit_centered(&mut grid, 12, "Game Over!");
                blit_centered(&mut grid, 14, &format!("Final Score: {}", state.score));
                blit_centered(&mut grid, 16, "Press R to return to start");
            }
        }
    }

    flush_grid(ctx, &grid)
}

fn draw_ground(grid: &mut [[char; COLS]; ROWS]) {
    let ground_row = px_to_row(PLAY_HEIGHT - GROUND_HEIGHT);
    for row in grid.iter_mut().skip(ground_row) {
        row.fill('=');
    }
}

fn draw_obstacle(grid: &mut [[char; COLS]; ROWS], x: f32, gap_y: f32, gap_size: f32) {
    let ground = PLAY_HEIGHT - GROUND_HEIGHT;
    for col in 0..COLS {
        let cx = (col as f32 + 0.5) * CELL_W;
        if cx < x || cx >= x + OBSTACLE_WIDTH {
            continue;
        }
        for (r, row) in grid.iter_mut().enumerate() {
            let cy = (r as f32 + 0.5) * CELL_H;
            if cy >= ground {
                break;
            }
            if cy < gap_y || cy > gap_y + gap_size {
                row[col] = '#';
            }
        }
    }
}

fn draw_body(grid: &mut [[char; COLS]; ROWS], y: f32) {
    let row = px_to_row(y + BODY_HEIGHT / 2.0).min(ROWS - 1);
    let col = ((BODY_X + BODY_WIDTH / 2.0) / CELL_W) as usize;
    grid[row][col - 1] = '@';
    grid[row][col] = '@';
}

fn px_to_row(y: f32) -> usize {
    (y.max(0.0) / CELL_H) as usize
}

fn blit(grid: &mut [[char; COLS]; ROWS], row: usize, col: usize, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        let col = col + i;
        if col < COLS {
            grid[row][col] = ch;
        }
    }
}

fn blit_centered(grid: &mut [[char; COLS]; ROWS], row: usize, text: &str) {
    let col = COLS.saturating_sub(text.chars().count()) / 2;
    blit(grid, row, col, text);
}

fn cell_color(ch: char) -> Color {
    match ch {
        '#' => Color::Green,
        '=' => Color::DarkRed,
        '@' => Color::Yellow,
        _ => Color::White,
    }
}

fn flush_grid(ctx: &mut Context, grid: &[[char; COLS]; ROWS]) -> io::Result<()> {
    queue!(ctx.out, cursor::MoveTo(0, 0))?;
    let mut current = Color::White;
    queue!(ctx.out, style::SetForegroundColor(current))?;

    for (r, row) in grid.iter().enumerate() {
        for &ch in row {
            let color = cell_color(ch);
            if color != current {
                queue!(ctx.out, style::SetForegroundColor(color))?;
                current = color;
            }
            queue!(ctx.out, style::Print(ch))?;
        }
        if r < ROWS - 1 {
            queue!(ctx.out, style::Print("\r\n"))?;
        }
    }
    queue!(ctx.out, style::ResetColor)?;
    ctx.out.flush()
}
