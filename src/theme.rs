//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::Palette;
use crate::tetromino::TetrominoKind;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Piece colours plus the UI colours around the board.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours indexed by `TetrominoKind::index()`.
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Borders.
    pub div_line: Color,
    /// Reference grid drawn on empty cells.
    pub grid: Color,
    /// Text (score, lines).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

const BG: Color = Color::Rgb(0x00, 0x00, 0x00);
const DIV_LINE: Color = Color::Rgb(0x3F, 0x44, 0x4F);
const GRID: Color = Color::Rgb(0x2A, 0x2E, 0x36);
const MAIN_FG: Color = Color::Rgb(0xFF, 0xFF, 0xFF);
const TITLE: Color = Color::Rgb(0xE5, 0xC0, 0x7B);

/// btop keys consulted for each piece, in `TetrominoKind::ALL` order.
const PIECE_KEYS: [(&str, &str); 7] = [
    ("piece_i", "hi_fg"),
    ("piece_o", "cpu_mid"),
    ("piece_t", "net_box"),
    ("piece_l", "temp_mid"),
    ("piece_j", "cpu_box"),
    ("piece_s", "mem_box"),
    ("piece_z", "cpu_end"),
];

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

impl Theme {
    /// Catalog piece colours on a black board.
    pub fn classic() -> Self {
        Self {
            pieces: TetrominoKind::ALL.map(|kind| rgb(kind.color())),
            bg: BG,
            div_line: DIV_LINE,
            grid: GRID,
            main_fg: MAIN_FG,
            title: TITLE,
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to the classic theme if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: Palette) -> Self {
        let mut t = Self::classic();
        t.apply_palette(palette);
        t
    }

    /// Override piece colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                self.pieces = [
                    Color::Rgb(0x00, 0xFF, 0xFF),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                    Color::Rgb(0xFF, 0x88, 0x00),
                    Color::Rgb(0x00, 0x88, 0xFF),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0x00),
                ];
                self.grid = Color::Rgb(0x44, 0x44, 0x44);
            }
            Palette::Colorblind => {
                // Okabe–Ito: no pair relies on red/green alone.
                self.pieces = [
                    Color::Rgb(0x56, 0xB4, 0xE9),
                    Color::Rgb(0xF0, 0xE4, 0x42),
                    Color::Rgb(0xCC, 0x79, 0xA7),
                    Color::Rgb(0xE6, 0x9F, 0x00),
                    Color::Rgb(0x00, 0x72, 0xB2),
                    Color::Rgb(0x00, 0x9E, 0x73),
                    Color::Rgb(0xD5, 0x5E, 0x00),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let defaults = Self::classic();
        let mut pieces = defaults.pieces;
        for (slot, (own, btop)) in pieces.iter_mut().zip(PIECE_KEYS) {
            if let Some(c) = get(own).or_else(|| get(btop)) {
                *slot = c;
            }
        }
        Self {
            pieces,
            bg: get("main_bg").or_else(|| get("meter_bg")).unwrap_or(defaults.bg),
            div_line: get("div_line").unwrap_or(defaults.div_line),
            grid: get("inactive_fg").unwrap_or(defaults.grid),
            main_fg: get("main_fg").unwrap_or(defaults.main_fg),
            title: get("title").unwrap_or(defaults.title),
        }
    }

    #[inline]
    pub fn piece_color(&self, kind: TetrominoKind) -> Color {
        self.pieces[kind.index()]
    }
}

#[inline]
pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    let (r, g, b) = match s.len() {
        6 => (channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?),
        3 => (
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        ),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(parse_hex("#12345"), Err(ThemeError::InvalidHex(_))));
        assert!(parse_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[meter_bg]="#31353F""##);
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_classic_uses_catalog_colours() {
        let theme = Theme::classic();
        assert_eq!(theme.piece_color(TetrominoKind::O), Color::Rgb(255, 255, 0));
        assert_eq!(theme.piece_color(TetrominoKind::T), Color::Rgb(128, 0, 128));
    }

    #[test]
    fn test_theme_file_overrides_piece() {
        let map = parse_theme_file("theme[piece_z]=\"#112233\"\ntheme[cpu_box]='#445566'\n");
        let theme = Theme::from_map(&map);
        assert_eq!(theme.piece_color(TetrominoKind::Z), Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(theme.piece_color(TetrominoKind::J), Color::Rgb(0x44, 0x55, 0x66));
        assert_eq!(theme.piece_color(TetrominoKind::I), Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let theme = Theme::load(Some(Path::new("/nonexistent/blocktris.theme")), Palette::Normal)
            .unwrap();
        assert_eq!(theme.bg, BG);
    }
}
