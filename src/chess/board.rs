//! Square-centric ("mailbox") representation of the chess board: each of the
//! 64 squares holds at most one [`Piece`].

use std::fmt::{self, Write};
use std::ops::Index;

use strum::IntoEnumIterator;

use crate::chess::core::{File, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE};
use crate::chess::error::Error;

/// Pieces of the backrank in the standard starting position, from
/// [`File::A`] to [`File::H`].
const BACKRANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The board owns all the pieces in play. A piece moves by being taken off
/// one square and placed onto another.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// Standard starting layout.
    ///
    /// ```
    /// use gambit::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "r n b q k b n r\n\
    ///      p p p p p p p p\n\
    ///      . . . . . . . .\n\
    ///      . . . . . . . .\n\
    ///      . . . . . . . .\n\
    ///      . . . . . . . .\n\
    ///      P P P P P P P P\n\
    ///      R N B Q K B N R"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                board.place(
                    Square::new(file, Rank::backrank(player)),
                    Some(Piece::new(player, kind)),
                );
                board.place(
                    Square::new(file, Rank::pawns_starting(player)),
                    Some(Piece::new(player, PieceKind::Pawn)),
                );
            }
        }
        board
    }

    /// Bounds-checked square lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] when `file` or `rank` is not within
    /// `0..BOARD_WIDTH`.
    pub const fn square_at(file: u8, rank: u8) -> Result<Square, Error> {
        Square::from_coordinates(file, rank)
    }

    /// Puts `piece` on the square, discarding whatever was there before.
    /// `None` clears the square.
    pub fn place(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square as usize] = piece;
    }

    /// Puts `piece` on the square and hands back its previous content.
    pub fn replace(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[square as usize], piece)
    }

    /// Clears the square and hands back the piece that was there.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    /// All occupied squares with their pieces, from [`Square::A1`] to
    /// [`Square::H8`].
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self[square].map(|piece| (square, piece)))
    }

    /// Squares occupied by the pieces of `player`.
    pub fn player_pieces(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.owner == player)
    }

    /// Location of the `player`'s king. This is recomputed on every call:
    /// castling, promotion and captures relocate pieces between calls.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        self.player_pieces(player)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Number of `player`'s pieces of the given kind.
    #[must_use]
    pub fn count(&self, player: Player, kind: PieceKind) -> usize {
        self.player_pieces(player)
            .filter(|(_, piece)| piece.kind == kind)
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, square: Square) -> &Self::Output {
        &self.squares[square as usize]
    }
}

impl fmt::Display for Board {
    /// Dumps the board in a human-readable format ('.' - empty square, piece
    /// symbol - occupied square), rank 8 first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self[Square::new(file, rank)] {
                    Some(piece) => write!(f, "{piece}")?,
                    None => f.write_char('.')?,
                }
                if file != File::H {
                    f.write_char(' ')?;
                }
            }
            if rank != Rank::One {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
