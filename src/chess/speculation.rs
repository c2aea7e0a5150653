//! Reversible board mutations used to test hypothetical consequences of a
//! move (i.e. whether it leaves the king attacked).

use std::ops::Deref;

use arrayvec::ArrayVec;

use crate::chess::board::Board;
use crate::chess::core::{Piece, Square};

/// A scoped, journaled mutation of the [`Board`]. Every square written
/// through [`Speculation::place`] is restored when the speculation is
/// dropped, on every exit path. [`Speculation::commit`] keeps the changes
/// instead.
///
/// Castling touches the most squares of any move: king and rook origins and
/// destinations.
pub(crate) struct Speculation<'a> {
    board: &'a mut Board,
    journal: ArrayVec<(Square, Option<Piece>), 4>,
}

impl<'a> Speculation<'a> {
    pub(crate) fn new(board: &'a mut Board) -> Self {
        Self {
            board,
            journal: ArrayVec::new(),
        }
    }

    pub(crate) fn place(&mut self, square: Square, piece: Option<Piece>) {
        let previous = self.board.replace(square, piece);
        self.journal.push((square, previous));
    }

    /// Makes the speculative changes permanent.
    pub(crate) fn commit(mut self) {
        self.journal.clear();
    }
}

impl Deref for Speculation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        // Squares may be written more than once: undo in reverse order.
        while let Some((square, piece)) = self.journal.pop() {
            self.board.place(square, piece);
        }
    }
}
