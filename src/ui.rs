//! Layout and drawing: playfield, grid overlay, hold, next queue, score,
//! pause and game over.

use crate::app::Screen;
use crate::board::Cell;
use crate::game::GameState;
use crate::piece::Piece;
use crate::tetromino::Shape;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Terminal columns per board cell (cells are drawn as `██`).
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 18;
/// Preview shapes use half-blocks: two shape rows per terminal row.
const PREVIEW_ROWS: u16 = 2;

const FILLED: &str = "██";
const GRID_MARK: &str = "· ";

/// Playfield size in terminal cells, border included.
fn playfield_size(state: &GameState) -> (u16, u16) {
    let board = state.board();
    (
        board.width() as u16 * CELL_WIDTH + 2,
        board.height() as u16 + 2,
    )
}

/// Draw the current screen, with the pause or game-over panel on top.
pub fn draw(frame: &mut Frame, screen: Screen, state: &GameState, theme: &Theme, paused: bool) {
    let area = frame.area();
    draw_game(frame, state, theme, area);
    match screen {
        Screen::Playing if paused => draw_pause_overlay(frame, theme, area),
        Screen::Playing => {}
        Screen::GameOver => draw_game_over(frame, state, theme, area),
    }
}

/// Playfield + sidebar, centred in the area.
fn draw_game(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let (pw, ph) = playfield_size(state);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert_chunks[1]);

    draw_playfield(frame.buffer_mut(), state, theme, inner[0]);
    draw_sidebar(frame.buffer_mut(), state, theme, inner[1]);
}

fn border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.div_line).bg(theme.bg)
}

fn draw_playfield(buf: &mut Buffer, state: &GameState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(theme))
        .title(Span::styled(" Blocktris ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, buf);

    let board = state.board();
    for (y, row) in board.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let (symbol, style) = match cell {
                Cell::Filled(kind) => (FILLED, Style::default().fg(theme.piece_color(*kind)).bg(theme.bg)),
                Cell::Empty => (GRID_MARK, Style::default().fg(theme.grid).bg(theme.bg)),
            };
            put_cell(buf, inner, x as i32, y as i32, symbol, style);
        }
    }

    if !state.is_game_over() {
        draw_active_piece(buf, state.current(), theme, inner);
    }
}

fn draw_active_piece(buf: &mut Buffer, piece: &Piece, theme: &Theme, inner: Rect) {
    let style = Style::default().fg(theme.piece_color(piece.kind())).bg(theme.bg);
    for (x, y) in piece.cells() {
        put_cell(buf, inner, x, y, FILLED, style);
    }
}

/// Write one board cell; anything outside `inner` (e.g. above the board) is skipped.
fn put_cell(buf: &mut Buffer, inner: Rect, x: i32, y: i32, symbol: &str, style: Style) {
    if x < 0 || y < 0 {
        return;
    }
    let rx = inner.x + x as u16 * CELL_WIDTH;
    let ry = inner.y + y as u16;
    if rx + CELL_WIDTH <= inner.x + inner.width && ry < inner.y + inner.height {
        buf.set_string(rx, ry, symbol, style);
    }
}

fn draw_sidebar(buf: &mut Buffer, state: &GameState, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PREVIEW_ROWS + 2), // Hold
            Constraint::Length(1),
            Constraint::Length(3 * PREVIEW_ROWS + 2 + 2), // Next: three previews, two gaps
            Constraint::Length(1),
            Constraint::Length(4), // Score + lines
            Constraint::Fill(1),
        ])
        .split(area);

    let titled = |title: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(theme))
            .title(Span::styled(title, Style::default().fg(theme.title)))
    };

    // --- Hold ---
    let hold_block = if state.hold_blocked() {
        titled(" Hold ").border_style(Style::default().fg(theme.grid).bg(theme.bg))
    } else {
        titled(" Hold ")
    };
    let hold_inner = hold_block.inner(chunks[0]);
    hold_block.render(chunks[0], buf);
    if let Some(piece) = state.held() {
        draw_shape_preview(buf, piece.shape(), theme.piece_color(piece.kind()), theme, hold_inner);
    }

    // --- Next ---
    let next_block = titled(" Next ");
    let next_inner = next_block.inner(chunks[2]);
    next_block.render(chunks[2], buf);
    for (i, piece) in state.next_pieces().enumerate() {
        let slot = Rect {
            x: next_inner.x,
            y: next_inner.y + i as u16 * (PREVIEW_ROWS + 1),
            width: next_inner.width,
            height: PREVIEW_ROWS,
        }
        .intersection(next_inner);
        draw_shape_preview(buf, piece.shape(), theme.piece_color(piece.kind()), theme, slot);
    }

    // --- Stats ---
    let stats_block = titled(" Stats ");
    let stats_inner = stats_block.inner(chunks[4]);
    stats_block.render(chunks[4], buf);
    let label = Style::default().fg(theme.title);
    let value = Style::default().fg(theme.main_fg);
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Lines: ", label),
            Span::styled(state.lines().to_string(), value),
        ]),
    ];
    Paragraph::new(stats_lines).render(stats_inner, buf);
}

/// Draw a shape centred in `area`, two shape rows per terminal row using `▀`
/// (fg = upper row, bg = lower row).
fn draw_shape_preview(buf: &mut Buffer, shape: &Shape, color: Color, theme: &Theme, area: Rect) {
    let w = shape.width() as u16 * CELL_WIDTH;
    let h = (shape.height() as u16).div_ceil(2);
    let off_x = area.width.saturating_sub(w) / 2;
    let off_y = area.height.saturating_sub(h) / 2;
    let paint = |filled: bool| if filled { color } else { theme.bg };

    for term_row in 0..h {
        let top = term_row as usize * 2;
        for col in 0..shape.width() {
            let upper = shape.is_filled(top, col);
            let lower = shape.is_filled(top + 1, col);
            if !upper && !lower {
                continue;
            }
            let rx = area.x + off_x + col as u16 * CELL_WIDTH;
            let ry = area.y + off_y + term_row;
            if rx + CELL_WIDTH <= area.x + area.width && ry < area.y + area.height {
                buf.set_string(
                    rx,
                    ry,
                    "▀▀",
                    Style::default().fg(paint(upper)).bg(paint(lower)),
                );
            }
        }
    }
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered_popup(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border_style(theme)))
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let popup = centered_popup(area, 28, 9);
    let fg = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", state.score()), fg)),
        Line::from(Span::styled(format!(" Lines: {} ", state.lines()), fg)),
        Line::from(""),
        Line::from(Span::styled(" R — Restart    Q — Quit ", fg.bold())),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(theme))
                .title(Span::styled(" Blocktris ", Style::default().fg(theme.title))),
        )
        .render(popup, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(state: &GameState, screen: Screen, paused: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).unwrap();
        let theme = Theme::classic();
        terminal
            .draw(|f| draw(f, screen, state, &theme, paused))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn new_state() -> GameState {
        GameState::new(&GameConfig {
            seed: Some(8),
            fall_interval_ms: 500,
            hold_once: false,
        })
    }

    #[test]
    fn test_playing_screen_shows_panels() {
        let text = render(&new_state(), Screen::Playing, false);
        assert!(text.contains("Blocktris"));
        assert!(text.contains("Hold"));
        assert!(text.contains("Next"));
        assert!(text.contains("Score: 0"));
        assert!(text.contains("Lines: 0"));
        assert!(text.contains('█'));
        assert!(text.contains('·'));
    }

    #[test]
    fn test_pause_overlay() {
        let text = render(&new_state(), Screen::Playing, true);
        assert!(text.contains("Paused"));
    }

    #[test]
    fn test_game_over_panel() {
        let mut state = new_state();
        for _ in 0..200 {
            state.hard_drop();
        }
        assert!(state.is_game_over());
        let text = render(&state, Screen::GameOver, false);
        assert!(text.contains("Game Over"));
        assert!(text.contains("Restart"));
    }

    #[test]
    fn test_locked_cells_are_drawn_with_piece_colour() {
        let mut state = new_state();
        state.hard_drop();
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).unwrap();
        let theme = Theme::classic();
        terminal
            .draw(|f| draw(f, Screen::Playing, &state, &theme, false))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let colours: Vec<Color> = (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .filter(|&pos| buffer[pos].symbol() == "█")
            .map(|pos| buffer[pos].fg)
            .collect();
        let locked = state
            .board()
            .rows()
            .flat_map(|row| row.iter())
            .find_map(|c| match c {
                Cell::Filled(kind) => Some(theme.piece_color(*kind)),
                Cell::Empty => None,
            });
        assert!(locked.is_some_and(|c| colours.contains(&c)));
    }
}
