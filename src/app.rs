//! App: terminal init, main loop, gravity clock and key handling.

use crate::GameConfig;
use crate::game::GameState;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Target frame time (~60 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

/// Counts elapsed time and reports how many whole fall intervals have passed.
#[derive(Debug, Clone)]
pub struct GravityClock {
    interval: Duration,
    elapsed: Duration,
}

impl GravityClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Add `dt`; returns the number of gravity steps now due.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.elapsed += dt;
        if self.interval.is_zero() {
            self.elapsed = Duration::ZERO;
            return 1;
        }
        let mut steps = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            steps += 1;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    screen: Screen,
    paused: bool,
    clock: GravityClock,
    last_frame: Instant,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let state = GameState::new(&config);
        let clock = GravityClock::new(Duration::from_millis(config.fall_interval_ms));
        Self {
            config,
            theme,
            state,
            screen: Screen::Playing,
            paused: false,
            clock,
            last_frame: Instant::now(),
        }
    }

    fn reset_game(&mut self) {
        self.state = GameState::new(&self.config);
        self.screen = Screen::Playing;
        self.paused = false;
        self.clock.reset();
        self.last_frame = Instant::now();
    }

    /// Apply one action. Returns false when the app should exit.
    fn handle_action(&mut self, action: Action) -> bool {
        match (self.screen, action) {
            (_, Action::Quit) => return false,
            (Screen::GameOver, Action::Restart) => {
                info!("restart");
                self.reset_game();
            }
            (Screen::GameOver, _) => {}
            (Screen::Playing, Action::Pause) => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
            }
            (Screen::Playing, _) if self.paused => {}
            (Screen::Playing, action) => self.apply_game_action(action),
        }
        true
    }

    fn apply_game_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => self.state.move_left(),
            Action::MoveRight => self.state.move_right(),
            Action::Rotate => self.state.rotate(),
            Action::SoftDrop => {
                self.state.soft_drop();
            }
            Action::HardDrop => self.state.hard_drop(),
            Action::Hold => self.state.hold(),
            Action::Pause | Action::Restart | Action::Quit | Action::None => {}
        }
    }

    /// Advance gravity by the time since the last frame and notice game over.
    fn tick(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        for _ in 0..self.clock.advance(dt) {
            self.state.gravity_tick();
        }
        if self.state.is_game_over() {
            info!(score = self.state.score(), lines = self.state.lines(), "game over");
            self.screen = Screen::GameOver;
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        info!("terminal ready");

        let result = self.run_loop(&mut terminal);

        let _ = terminal.show_cursor();
        let restored = restore_terminal(
            || execute!(std::io::stdout(), LeaveAlternateScreen),
            disable_raw_mode,
        );
        info!("terminal restored");

        result?;
        restored?;
        Ok(())
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.last_frame = Instant::now();
        loop {
            let frame_start = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(f, self.screen, &self.state, &self.theme, self.paused);
            })?;

            let timeout = FRAME_DURATION.saturating_sub(frame_start.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if !self.handle_action(key_to_action(key)) {
                            info!("quit");
                            return Ok(());
                        }
                    }
                }
            }

            self.tick(Instant::now());
        }
    }
}

/// Run both restore steps even if the first fails; report the first error.
fn restore_terminal(
    leave_screen: impl FnOnce() -> std::io::Result<()>,
    disable_raw: impl FnOnce() -> std::io::Result<()>,
) -> std::io::Result<()> {
    let left = leave_screen();
    let raw = disable_raw();
    left.and(raw)
}
