//! Rules of chess that go beyond piece geometry: king safety, checkmate and
//! stalemate detection.
//!
//! Every legality decision goes through [`is_safe`]: the move is applied to
//! the board speculatively, the moving side's king is tested for attacks and
//! the board is restored. The same test backs per-piece queries, whole-board
//! scans, checkmate defenses and committing moves.

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::chess::board::Board;
use crate::chess::core::{Direction, File, Piece, PieceKind, Player, Rank, Square};
use crate::chess::geometry::{between, can_reach};
use crate::chess::speculation::Speculation;

/// Pieces of one side. A position can not have more than 16 pieces per side
/// (promotions only replace pawns).
pub(crate) type Squares = ArrayVec<Square, 16>;

/// How a move that passed the geometry test affects the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlyKind {
    Regular,
    /// King moves onto its own rook: the king lands on the c or g file, the
    /// rook on the square the king crosses.
    Castle { king_to: Square, rook_to: Square },
    /// Diagonal pawn move onto an empty square: the bypassed pawn is removed.
    EnPassant { captured: Square },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ply {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) kind: PlyKind,
}

impl Ply {
    /// Expects the move to be geometrically valid.
    pub(crate) fn classify(board: &Board, from: Square, to: Square) -> Self {
        let kind = match (board[from], board[to]) {
            (Some(king), Some(rook))
                if king.kind == PieceKind::King
                    && rook.kind == PieceKind::Rook
                    && king.owner == rook.owner =>
            {
                let rank = from.rank();
                let (king_file, rook_file) = if to.file() > from.file() {
                    (File::G, File::F)
                } else {
                    (File::C, File::D)
                };
                PlyKind::Castle {
                    king_to: Square::new(king_file, rank),
                    rook_to: Square::new(rook_file, rank),
                }
            },
            (Some(pawn), None) if pawn.kind == PieceKind::Pawn && from.file() != to.file() => {
                PlyKind::EnPassant {
                    captured: Square::new(to.file(), from.rank()),
                }
            },
            _ => PlyKind::Regular,
        };
        Self { from, to, kind }
    }

    /// The opponent's piece this move removes and where it stood.
    pub(crate) fn captured(&self, board: &Board) -> Option<(Square, Piece)> {
        let square = match self.kind {
            PlyKind::Regular => self.to,
            PlyKind::EnPassant { captured } => captured,
            PlyKind::Castle { .. } => return None,
        };
        board[square].map(|piece| (square, piece))
    }

    /// Performs the move through the speculation. `placed` is the piece that
    /// lands on the destination: it might differ from the one on `from` after
    /// promotion or flag updates.
    pub(crate) fn apply(&self, speculation: &mut Speculation<'_>, placed: Piece) {
        match self.kind {
            PlyKind::Regular => (),
            PlyKind::EnPassant { captured } => speculation.place(captured, None),
            PlyKind::Castle { king_to, rook_to } => {
                let rook = speculation[self.to].map(Piece::moved);
                speculation.place(self.from, None);
                speculation.place(self.to, None);
                speculation.place(king_to, Some(placed));
                speculation.place(rook_to, rook);
                return;
            },
        }
        speculation.place(self.to, Some(placed));
        speculation.place(self.from, None);
    }
}

fn locate_king(board: &Board, player: Player) -> Square {
    match board.king(player) {
        Some(square) => square,
        None => unreachable!("{player} king is missing from the board"),
    }
}

/// Squares of `by`'s pieces that can reach `target`.
pub fn attackers(board: &Board, target: Square, by: Player) -> impl Iterator<Item = Square> + '_ {
    board
        .player_pieces(by)
        .map(|(square, _)| square)
        .filter(move |&square| can_reach(board, square, target))
}

/// Checks whether any opponent piece can reach the square of `player`'s king.
///
/// # Panics
///
/// The king is expected to be on the board: a missing king means the game
/// state is corrupted.
#[must_use]
pub fn king_in_danger(board: &Board, player: Player) -> bool {
    let king = locate_king(board, player);
    attackers(board, king, player.opponent()).next().is_some()
}

/// Castling is not allowed out of check or through an attacked square. The
/// king is stepped onto `transit` speculatively to find out.
pub(crate) fn castle_path_safe(
    board: &mut Board,
    king_from: Square,
    transit: Square,
    owner: Player,
) -> bool {
    if king_in_danger(board, owner) {
        return false;
    }
    let king = board[king_from];
    let mut speculation = Speculation::new(board);
    speculation.place(king_from, None);
    speculation.place(transit, king);
    !king_in_danger(&speculation, owner)
}

/// Make/test/unmake: applies the move from `from` to `to` and checks that the
/// mover's king is not attacked afterwards. The board is restored before
/// returning.
///
/// The move is expected to pass [`can_reach`]. An empty `from` is never safe.
#[must_use]
pub fn is_safe(board: &mut Board, from: Square, to: Square) -> bool {
    let Some(piece) = board[from] else {
        return false;
    };
    let ply = Ply::classify(board, from, to);
    if let PlyKind::Castle { rook_to, .. } = ply.kind {
        if !castle_path_safe(board, from, rook_to, piece.owner) {
            return false;
        }
    }
    let mut speculation = Speculation::new(board);
    ply.apply(&mut speculation, piece);
    !king_in_danger(&speculation, piece.owner)
}

/// Squares file by file: `a1, a2, ..., a8, b1, ...`. Scans that report
/// squares to the caller use this order.
pub(crate) fn by_file() -> impl Iterator<Item = Square> {
    File::iter().flat_map(|file| Rank::iter().map(move |rank| Square::new(file, rank)))
}

/// All squares the piece on `from` can legally move to, file by file (`a1`
/// to `a8`, then the b file and so on). Empty square yields no destinations.
///
/// ```
/// use gambit::chess::board::Board;
/// use gambit::chess::core::Square;
/// use gambit::chess::rules::legal_destinations;
///
/// let mut board = Board::starting();
/// assert_eq!(
///     legal_destinations(&mut board, Square::B1),
///     vec![Square::A3, Square::C3]
/// );
/// assert!(legal_destinations(&mut board, Square::E4).is_empty());
/// ```
#[must_use]
pub fn legal_destinations(board: &mut Board, from: Square) -> Vec<Square> {
    by_file()
        .filter(|&to| can_reach(board, from, to) && is_safe(board, from, to))
        .collect()
}

fn defenders(board: &Board, player: Player) -> Squares {
    board.player_pieces(player).map(|(square, _)| square).collect()
}

/// Whether any piece of `player` has at least one legal destination.
#[must_use]
pub fn has_legal_move(board: &mut Board, player: Player) -> bool {
    defenders(board, player).into_iter().any(|from| {
        Square::iter().any(|to| can_reach(board, from, to) && is_safe(board, from, to))
    })
}

/// `player` has no legal move. This alone does not make a stalemate: a
/// player without legal moves while in check is checkmated, so the caller
/// has to rule out check first.
#[must_use]
pub fn is_stalemate(board: &mut Board, player: Player) -> bool {
    !has_legal_move(board, player)
}

/// Decides whether `player`, who is in check, has a way out. Defenses are
/// tried in order:
///
/// 1. The king steps onto a neighbouring square that is not attacked.
/// 2. With two or more checking pieces nothing else can help.
/// 3. A piece captures the checking piece (including en passant).
/// 4. Knights and pawns can not be blocked.
/// 5. A piece moves in between the checking piece and the king.
///
/// Each candidate defense is validated with [`is_safe`], so pinned pieces do
/// not count as defenders.
#[must_use]
pub fn king_in_checkmate(board: &mut Board, player: Player) -> bool {
    let king = locate_king(board, player);
    let threats: Squares = attackers(board, king, player.opponent()).collect();
    if threats.is_empty() {
        return false;
    }

    let escapes = Direction::iter()
        .filter_map(|direction| king.shift(direction))
        .any(|to| can_reach(board, king, to) && is_safe(board, king, to));
    if escapes {
        return false;
    }

    let [threat] = threats.as_slice() else {
        return true;
    };
    let threat = *threat;
    let defenders = defenders(board, player);
    let defends = |board: &mut Board, to: Square| {
        defenders
            .iter()
            .any(|&from| can_reach(board, from, to) && is_safe(board, from, to))
    };

    if defends(board, threat) {
        return false;
    }
    let Some(attacker) = board[threat] else {
        unreachable!("threat set only contains occupied squares");
    };
    if attacker.kind == PieceKind::Pawn && attacker.en_passant_eligible() {
        if let Some(target) = threat.shift(player.push_direction()) {
            let en_passant = defenders.iter().any(|&from| {
                board[from].is_some_and(|piece| piece.kind == PieceKind::Pawn)
                    && from.file() != target.file()
                    && board[target].is_none()
                    && can_reach(board, from, target)
                    && is_safe(board, from, target)
            });
            if en_passant {
                return false;
            }
        }
    }

    if matches!(attacker.kind, PieceKind::Knight | PieceKind::Pawn) {
        return true;
    }

    !between(threat, king)
        .into_iter()
        .any(|square| defends(board, square))
}
