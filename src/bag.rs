//! Bag of 7 tetrominoes: each refill appends one shuffled permutation.

use crate::board::BOARD_WIDTH;
use crate::piece::Piece;
use crate::tetromino::TetrominoKind;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Bag {
    queue: VecDeque<TetrominoKind>,
    rng: StdRng,
}

impl Bag {
    /// A seeded bag deals the same sequence every time; `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut bag = Self {
            queue: VecDeque::with_capacity(TetrominoKind::ALL.len()),
            rng,
        };
        bag.refill();
        bag
    }

    /// Append a uniformly shuffled permutation of all seven kinds.
    pub fn refill(&mut self) {
        let mut all = TetrominoKind::ALL;
        all.shuffle(&mut self.rng);
        self.queue.extend(all);
        tracing::trace!(pending = self.queue.len(), "bag refilled");
    }

    /// Pop the head kind, refilling first if the bag ran dry.
    pub fn next_kind(&mut self) -> TetrominoKind {
        loop {
            if let Some(kind) = self.queue.pop_front() {
                return kind;
            }
            self.refill();
        }
    }

    /// Materialize the next kind as a piece at its spawn position.
    pub fn create_new_piece(&mut self) -> Piece {
        Piece::spawn(self.next_kind(), BOARD_WIDTH)
    }
}
