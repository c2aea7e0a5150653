//! Record of committed moves.

use std::fmt;

use crate::chess::core::{Piece, PieceKind, Player, Promotion, Square};

bitflags::bitflags! {
    /// More information about [`Move`] that is needed to replay or describe
    /// it (e.g. in Standard Algebraic Notation).
    ///
    /// Apart from the "regular" moves (simply moving a piece from one square
    /// to the other), there are few important rules:
    ///
    /// - [En passant] is a capture of opponent's pawn "in passing" (right
    ///   after it advances two squares from its original position). The
    ///   captured pawn does not stand on the destination square.
    /// - The [Castle] move involves a king and a rook "jumping" over each
    ///   other. It is submitted as the king moving onto its own rook, but
    ///   recorded with the king's final square as the destination.
    ///
    /// [En passant]: https://en.wikipedia.org/wiki/En_passant
    /// [Castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        /// A piece of the opponent was removed from the board.
        const CAPTURE = 0b0_0001;
        #[allow(missing_docs)]
        const CASTLE = 0b0_0010;
        #[allow(missing_docs)]
        const EN_PASSANT = 0b0_0100;
        /// A pawn reached the last rank and was replaced.
        const PROMOTION = 0b0_1000;
        /// The move left the opponent's king attacked.
        const CHECK = 0b1_0000;
    }
}

/// A move that has been committed to the game history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    side: Player,
    piece: Piece,
    from: Square,
    to: Square,
    captured: Option<(Square, Piece)>,
    rook: Option<(Square, Square)>,
    promotion: Option<Promotion>,
    flags: MoveFlags,
}

impl Move {
    pub(crate) const fn new(side: Player, piece: Piece, from: Square, to: Square) -> Self {
        Self {
            side,
            piece,
            from,
            to,
            captured: None,
            rook: None,
            promotion: None,
            flags: MoveFlags::empty(),
        }
    }

    pub(crate) fn set_captured(&mut self, square: Square, piece: Piece) {
        self.captured = Some((square, piece));
        self.flags.insert(MoveFlags::CAPTURE);
    }

    pub(crate) fn set_castle(&mut self, king_to: Square, rook_from: Square, rook_to: Square) {
        self.to = king_to;
        self.rook = Some((rook_from, rook_to));
        self.flags.insert(MoveFlags::CASTLE);
    }

    pub(crate) fn set_promotion(&mut self, promotion: Promotion) {
        self.promotion = Some(promotion);
        self.flags.insert(MoveFlags::PROMOTION);
    }

    pub(crate) fn insert_flags(&mut self, flags: MoveFlags) {
        self.flags.insert(flags);
    }

    /// Color of the player who made the move. Participants are seated once
    /// per game, [`crate::Game::participant`] maps the color back to them.
    #[must_use]
    pub const fn side(&self) -> Player {
        self.side
    }

    /// The moving piece as it stood on `from`, before the move.
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Destination of the moving piece. For castling this is the king's final
    /// square, not the square of the rook it was submitted with.
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The captured piece and the square it was removed from. The square
    /// differs from [`Move::to`] for en passant captures.
    #[must_use]
    pub const fn captured(&self) -> Option<(Square, Piece)> {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_castle(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_promotion(&self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn gives_check(&self) -> bool {
        self.flags.contains(MoveFlags::CHECK)
    }

    /// Origin and destination of the rook that took part in castling.
    #[must_use]
    pub const fn castled_rook(&self) -> Option<(Square, Square)> {
        self.rook
    }

    /// The piece a pawn was promoted to.
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", PieceKind::from(promotion))?;
        }
        Ok(())
    }
}
