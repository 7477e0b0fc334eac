//! Game state: board, current piece, next queue, hold slot, score.
//!
//! `GameState` is the only thing that mutates the board, the piece or the
//! bag. Every command is a silent no-op once the game is over.

use crate::GameConfig;
use crate::bag::Bag;
use crate::board::{Board, LockOutcome};
use crate::piece::Piece;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Upcoming pieces shown to the player.
pub const NEXT_QUEUE_LEN: usize = 3;

/// Points for clearing 0..=4 rows with one lock.
const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Score for `cleared` rows; more than four counts as four.
pub fn line_clear_score(cleared: usize) -> u32 {
    LINE_SCORES[cleared.min(LINE_SCORES.len() - 1)]
}

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    bag: Bag,
    current: Piece,
    next_pieces: VecDeque<Piece>,
    held: Option<Piece>,
    /// When set, a second hold is ignored until the next lock.
    hold_once: bool,
    hold_used: bool,
    score: u32,
    lines: u32,
    game_over: bool,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        let mut bag = Bag::new(config.seed);
        let current = bag.create_new_piece();
        let next_pieces = (0..NEXT_QUEUE_LEN).map(|_| bag.create_new_piece()).collect();
        info!(seed = ?config.seed, hold_once = config.hold_once, "new game");
        Self {
            board: Board::new(),
            bag,
            current,
            next_pieces,
            held: None,
            hold_once: config.hold_once,
            hold_used: false,
            score: 0,
            lines: 0,
            game_over: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next_pieces(&self) -> impl ExactSizeIterator<Item = &Piece> {
        self.next_pieces.iter()
    }

    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// True while `hold_once` is on and this piece came from a hold.
    pub fn hold_blocked(&self) -> bool {
        self.hold_once && self.hold_used
    }

    fn try_translate(&mut self, dx: i32, dy: i32) -> bool {
        if self.game_over || self.current.collides(&self.board, dx, dy) {
            return false;
        }
        self.current.translate(dx, dy);
        true
    }

    pub fn move_left(&mut self) {
        self.try_translate(-1, 0);
    }

    pub fn move_right(&mut self) {
        self.try_translate(1, 0);
    }

    /// Move down one row if possible. Never locks; returns whether it moved.
    pub fn soft_drop(&mut self) -> bool {
        self.try_translate(0, 1)
    }

    /// Drop until resting, then lock.
    pub fn hard_drop(&mut self) {
        if self.game_over {
            return;
        }
        let mut distance = 0;
        while self.try_translate(0, 1) {
            distance += 1;
        }
        debug!(kind = ?self.current.kind(), distance, "hard drop");
        self.lock_and_advance();
    }

    pub fn rotate(&mut self) {
        if self.game_over {
            return;
        }
        self.current.rotate(&self.board);
    }

    /// Put the current piece aside. An empty slot takes the piece and the next
    /// queue supplies a new one; otherwise the two are swapped. The piece that
    /// becomes active is moved back to its spawn position.
    pub fn hold(&mut self) {
        if self.game_over || self.hold_blocked() {
            return;
        }
        let incoming = match self.held.take() {
            Some(held) => held,
            None => self.pull_next(),
        };
        let outgoing = std::mem::replace(&mut self.current, incoming);
        debug!(held = ?outgoing.kind(), active = ?self.current.kind(), "hold");
        self.held = Some(outgoing);
        self.current.reset_to_spawn(self.board.width());
        self.hold_used = true;
    }

    /// Write the current piece into the board, clear rows, score them and
    /// bring in the next piece.
    pub fn lock_and_advance(&mut self) {
        if self.game_over {
            return;
        }
        if self.board.lock(&self.current) == LockOutcome::AboveBoard {
            info!(kind = ?self.current.kind(), score = self.score, "locked above the board, game over");
            self.game_over = true;
            return;
        }
        let cleared = self.board.clear_lines();
        self.lines = self.lines.saturating_add(cleared as u32);
        self.score = self.score.saturating_add(line_clear_score(cleared));
        debug!(
            kind = ?self.current.kind(),
            position = ?self.current.position(),
            cleared,
            score = self.score,
            "piece locked"
        );
        self.hold_used = false;
        self.current = self.pull_next();
        self.check_block_out();
    }

    /// One gravity step: fall a row, or lock if resting.
    pub fn gravity_tick(&mut self) {
        if self.game_over {
            return;
        }
        if !self.soft_drop() {
            self.lock_and_advance();
        }
    }

    /// Front of the next queue; a fresh piece from the bag refills the tail.
    fn pull_next(&mut self) -> Piece {
        let fresh = self.bag.create_new_piece();
        match self.next_pieces.pop_front() {
            Some(next) => {
                self.next_pieces.push_back(fresh);
                next
            }
            None => fresh,
        }
    }

    /// A piece that cannot exist where it appears ends the game.
    fn check_block_out(&mut self) {
        if self.current.collides(&self.board, 0, 0) {
            info!(kind = ?self.current.kind(), score = self.score, lines = self.lines, "spawn blocked, game over");
            self.game_over = true;
        }
    }
}
