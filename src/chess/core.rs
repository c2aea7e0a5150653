//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use itertools::Itertools;

use crate::chess::error::Error;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use gambit::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use gambit::chess::core::Square;
/// use std::mem;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Creates a square from zero-based numeric coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if either coordinate is outside
    /// `0..BOARD_WIDTH`.
    pub const fn from_coordinates(file: u8, rank: u8) -> Result<Self, Error> {
        if file >= BOARD_WIDTH || rank >= BOARD_WIDTH {
            return Err(Error::OutOfBounds { file, rank });
        }
        Ok(unsafe { mem::transmute(file + rank * BOARD_WIDTH) })
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Zero-based `(file, rank)` pair.
    #[must_use]
    pub const fn coordinates(self) -> (u8, u8) {
        (self.file() as u8, self.rank() as u8)
    }

    /// Moves the square by the given number of files and ranks. Returns
    /// `None` when the result would leave the board.
    #[must_use]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if file < 0 || rank < 0 {
            return None;
        }
        Self::from_coordinates(file as u8, rank as u8).ok()
    }

    /// Neighbouring square in the given direction, if it is on the board.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let (file_delta, rank_delta) = direction.delta();
        self.offset(file_delta, rank_delta)
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// The rank pieces of `player` start on. The opponent's backrank is where
    /// `player`'s pawns promote.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank pawns of `player` start on.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which pawns of this player advance.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match &self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol {
            'k' => Ok(Self::King),
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            'p' => Ok(Self::Pawn),
            _ => bail!("piece kind should be within \"kqrbnp\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

bitflags::bitflags! {
    /// Per-piece state that changes over the course of the game.
    ///
    /// The meaning of [`PieceState::MOVED`] depends on the piece kind:
    ///
    /// - Pawn: the initial move was made, double pushes are no longer
    ///   possible.
    /// - King: the king has moved (and with it, castled or lost the right to
    ///   castle).
    /// - Rook: the rook has moved and can no longer take part in castling.
    ///
    /// [`PieceState::EN_PASSANT`] is only ever set on pawns: the pawn has just
    /// been pushed by two squares and can be captured [en passant] on the very
    /// next ply.
    ///
    /// [en passant]: https://en.wikipedia.org/wiki/En_passant
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PieceState: u8 {
        #[allow(missing_docs)]
        const MOVED = 0b01;
        #[allow(missing_docs)]
        const EN_PASSANT = 0b10;
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
    state: PieceState,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self {
            owner,
            kind,
            state: PieceState::empty(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn state(self) -> PieceState {
        self.state
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn has_moved(self) -> bool {
        self.state.contains(PieceState::MOVED)
    }

    /// Whether this pawn may be captured en passant on the current ply.
    #[must_use]
    pub const fn en_passant_eligible(self) -> bool {
        self.state.contains(PieceState::EN_PASSANT)
    }

    /// The same piece after it has made a move.
    #[must_use]
    pub fn moved(mut self) -> Self {
        self.state.insert(PieceState::MOVED);
        self
    }

    pub(crate) fn set_en_passant(&mut self, eligible: bool) {
        debug_assert!(
            !eligible || self.kind == PieceKind::Pawn,
            "only pawns can be captured en passant"
        );
        self.state.set(PieceState::EN_PASSANT, eligible);
    }

    /// The piece a pawn turns into upon reaching the last rank.
    #[must_use]
    pub fn promote(self, promotion: Promotion) -> Self {
        debug_assert_eq!(self.kind, PieceKind::Pawn);
        Self::new(self.owner, promotion.into()).moved()
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses the conventional piece symbol: uppercase for White, lowercase
    /// for Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        match PieceKind::try_from(symbol.to_ascii_lowercase()) {
            Ok(kind) => Ok(Self::new(owner, kind)),
            Err(_) => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            // White player: uppercase symbols.
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            // Black player: lowercase symbols.
            Player::Black => f.write_str(&symbol),
        }
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Promotion {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}

/// Directions on the board from a perspective of White player.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum Direction {
    /// Also known as NorthWest.
    UpLeft,
    /// Also known as North.
    Up,
    /// Also known as NorthEast.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as West.
    Left,
    /// Also known as SouthWest.
    DownLeft,
    /// Also known as South.
    Down,
    /// Also known as SouthEast.
    DownRight,
}

impl Direction {
    /// `(file, rank)` step for a single move in this direction.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, 1),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::DownLeft => (-1, -1),
            Self::Down => (0, -1),
            Self::DownRight => (1, -1),
        }
    }
}
