//! Blocktris: falling-block puzzle game in the terminal.

mod app;
mod bag;
mod board;
mod game;
mod input;
mod piece;
mod tetromino;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;

/// Options derived from the CLI that the engine and the main loop use.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed RNG seed; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Gravity interval.
    pub fall_interval_ms: u64,
    /// Forbid a second hold before the next lock.
    pub hold_once: bool,
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            seed: args.seed,
            fall_interval_ms: args.fall_interval_ms,
            hold_once: args.hold_once,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path, args.verbose)?;
    }
    let theme = match theme::Theme::load(args.theme.as_deref(), args.palette) {
        Ok(theme) => theme,
        Err(err) => {
            warn!(%err, "theme not loaded, using defaults");
            let mut theme = theme::Theme::default();
            theme.apply_palette(args.palette);
            theme
        }
    };
    let config = GameConfig::from(&args);
    info!(?config, "starting");
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Log to a file; the terminal belongs to the game.
fn init_logging(path: &Path, verbose: u8) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .init();
    info!(%level, "logging initialized");
    Ok(())
}

/// Falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blocktris",
    version,
    about = "Falling-block puzzle game in the terminal: 7-bag pieces, hold, line clears.",
    long_about = "Blocktris is a terminal falling-block puzzle game.\n\n\
        Steer the falling tetromino, complete horizontal rows to clear them. One row \
        scores 100, two 300, three 500, four 800. The game ends when a new piece has no room.\n\n\
        CONTROLS:\n  Left/Right  Move      Up         Rotate     Down       Soft drop\n  Space       Hard drop C          Hold       P          Pause\n  Q / Esc     Quit      R          Restart (after game over)\n\n\
        Vim keys h/j/k/l also work."
)]
pub struct Args {
    /// Seed for the piece randomizer; the same seed deals the same pieces.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Gravity interval in milliseconds.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub fall_interval_ms: u64,

    /// Allow only one hold per piece (reset when a piece locks).
    #[arg(long)]
    pub hold_once: bool,

    /// Path to theme file (btop-style theme[key]=\"value\").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Piece colour palette: normal, high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["blocktris"]).unwrap();
        let config = GameConfig::from(&args);
        assert_eq!(config.fall_interval_ms, 500);
        assert_eq!(config.seed, None);
        assert!(!config.hold_once);
        assert_eq!(args.palette, Palette::Normal);
    }

    #[test]
    fn test_parse_options() {
        let args = Args::try_parse_from([
            "blocktris",
            "--seed",
            "42",
            "--hold-once",
            "--palette",
            "colourblind",
            "-vv",
        ])
        .unwrap();
        let config = GameConfig::from(&args);
        assert_eq!(config.seed, Some(42));
        assert!(config.hold_once);
        assert_eq!(args.palette, Palette::Colorblind);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
