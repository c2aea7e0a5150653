//! Movement geometry of each piece kind: whether a piece could travel from one
//! square to another on an otherwise static board.
//!
//! Geometry encodes the movement pattern and blocking by intervening pieces,
//! but knows nothing about check: a piece pinned to its king can still
//! "reach" squares here. King safety is layered on top in
//! [`crate::chess::rules`].

use arrayvec::ArrayVec;

use crate::chess::board::Board;
use crate::chess::core::{File, Piece, PieceKind, Rank, Square};

/// Squares strictly between two squares on a shared rank, file or diagonal.
/// At most 6 squares fit between two squares of an 8×8 board.
pub type Ray = ArrayVec<Square, 6>;

/// Checks whether the piece standing on `from` can travel to `to`.
///
/// An empty `from` square can not reach anything, and no piece can "reach"
/// the square it stands on. A piece never reaches a square occupied by its
/// own side, with the exception of castling: the king moving onto its own
/// rook is how castling is expressed.
#[must_use]
pub fn can_reach(board: &Board, from: Square, to: Square) -> bool {
    let Some(piece) = board[from] else {
        return false;
    };
    if from == to {
        return false;
    }
    if let Some(target) = board[to] {
        if target.owner == piece.owner {
            return piece.kind == PieceKind::King && is_castling(board, from, to);
        }
    }
    match piece.kind {
        PieceKind::King => king_step(from, to),
        PieceKind::Queen => (orthogonal(from, to) || diagonal(from, to)) && path_is_clear(board, from, to),
        PieceKind::Rook => orthogonal(from, to) && path_is_clear(board, from, to),
        PieceKind::Bishop => diagonal(from, to) && path_is_clear(board, from, to),
        PieceKind::Knight => knight_jump(from, to),
        PieceKind::Pawn => pawn_reach(board, piece, from, to),
    }
}

/// Castling is written as the king moving onto the square of its own rook.
/// It is possible when neither the king nor the rook has moved, the king
/// stands on its home square (e1 or e8), the rook stands on a corner of the
/// same backrank and every square between them is empty.
///
/// Whether the king is in check or walks through an attacked square is not a
/// matter of geometry and is verified by [`crate::chess::rules`].
#[must_use]
pub fn is_castling(board: &Board, from: Square, to: Square) -> bool {
    let (Some(king), Some(rook)) = (board[from], board[to]) else {
        return false;
    };
    king.kind == PieceKind::King
        && rook.kind == PieceKind::Rook
        && king.owner == rook.owner
        && !king.has_moved()
        && !rook.has_moved()
        && from == Square::new(File::E, Rank::backrank(king.owner))
        && to.rank() == from.rank()
        && matches!(to.file(), File::A | File::H)
        && path_is_clear(board, from, to)
}

/// Squares strictly between `from` and `to`, ordered starting next to `from`.
/// Both coordinates are interpolated by unit steps simultaneously. The result
/// is empty for adjacent squares and for squares that do not share a rank,
/// file or diagonal (e.g. a knight's jump).
#[must_use]
pub fn between(from: Square, to: Square) -> Ray {
    let mut ray = Ray::new();
    if !orthogonal(from, to) && !diagonal(from, to) {
        return ray;
    }
    let (file_delta, rank_delta) = delta(from, to);
    let step = (file_delta.signum(), rank_delta.signum());
    let mut current = from;
    while let Some(next) = current.offset(step.0, step.1) {
        if next == to {
            break;
        }
        ray.push(next);
        current = next;
    }
    ray
}

fn delta(from: Square, to: Square) -> (i8, i8) {
    let (from_file, from_rank) = from.coordinates();
    let (to_file, to_rank) = to.coordinates();
    (
        to_file as i8 - from_file as i8,
        to_rank as i8 - from_rank as i8,
    )
}

fn orthogonal(from: Square, to: Square) -> bool {
    from != to && (from.file() == to.file() || from.rank() == to.rank())
}

fn diagonal(from: Square, to: Square) -> bool {
    let (file_delta, rank_delta) = delta(from, to);
    file_delta != 0 && file_delta.abs() == rank_delta.abs()
}

fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
    between(from, to).iter().all(|&square| board[square].is_none())
}

fn king_step(from: Square, to: Square) -> bool {
    let (file_delta, rank_delta) = delta(from, to);
    file_delta.abs().max(rank_delta.abs()) == 1
}

fn knight_jump(from: Square, to: Square) -> bool {
    matches!(delta(from, to), (1 | -1, 2 | -2) | (2 | -2, 1 | -1))
}

fn pawn_reach(board: &Board, pawn: Piece, from: Square, to: Square) -> bool {
    let forward = pawn.owner.push_direction().delta().1;
    let (file_delta, rank_delta) = delta(from, to);
    match file_delta.abs() {
        // Pushes never capture.
        0 if rank_delta == forward => board[to].is_none(),
        0 if rank_delta == 2 * forward => {
            !pawn.has_moved()
                && from.rank() == Rank::pawns_starting(pawn.owner)
                && board[to].is_none()
                && path_is_clear(board, from, to)
        },
        // Captures: either a regular one or en passant of a pawn that has
        // just passed by.
        1 if rank_delta == forward => match board[to] {
            Some(_) => true,
            None => board[Square::new(to.file(), from.rank())].is_some_and(|bypassed| {
                bypassed.kind == PieceKind::Pawn
                    && bypassed.owner != pawn.owner
                    && bypassed.en_passant_eligible()
            }),
        },
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::chess::core::Player;

    fn setup(pieces: &[(Square, char)]) -> Board {
        let mut board = Board::empty();
        for &(square, symbol) in pieces {
            board.place(square, Some(Piece::try_from(symbol).unwrap()));
        }
        board
    }

    fn reachable(board: &Board, from: Square) -> Vec<Square> {
        Square::iter()
            .filter(|&to| can_reach(board, from, to))
            .collect()
    }

    #[test]
    fn rays() {
        assert_eq!(
            between(Square::A1, Square::H8).as_slice(),
            &[
                Square::B2,
                Square::C3,
                Square::D4,
                Square::E5,
                Square::F6,
                Square::G7
            ]
        );
        assert_eq!(
            between(Square::E8, Square::E4).as_slice(),
            &[Square::E7, Square::E6, Square::E5]
        );
        assert_eq!(between(Square::H4, Square::E1).as_slice(), &[Square::G3, Square::F2]);
        assert!(between(Square::E1, Square::E2).is_empty());
        assert!(between(Square::G1, Square::F3).is_empty());
        assert!(between(Square::A1, Square::C2).is_empty());
    }

    #[test]
    fn empty_square_reaches_nothing() {
        let board = Board::starting();
        assert!(reachable(&board, Square::E4).is_empty());
    }

    #[test]
    fn knight() {
        let board = Board::starting();
        assert_eq!(reachable(&board, Square::G1), vec![Square::F3, Square::H3]);
        let board = setup(&[(Square::D4, 'n'), (Square::E6, 'p'), (Square::C2, 'P')]);
        assert_eq!(
            reachable(&board, Square::D4),
            vec![
                Square::C2,
                Square::E2,
                Square::B3,
                Square::F3,
                Square::B5,
                Square::F5,
                Square::C6
            ]
        );
    }

    #[test]
    fn sliding_pieces_are_blocked() {
        let board = setup(&[
            (Square::D4, 'Q'),
            (Square::D6, 'p'),
            (Square::F4, 'P'),
            (Square::B2, 'r'),
        ]);
        let queen = reachable(&board, Square::D4);
        assert!(queen.contains(&Square::D6));
        assert!(!queen.contains(&Square::D7));
        assert!(!queen.contains(&Square::F4));
        assert!(queen.contains(&Square::E4));
        assert!(!queen.contains(&Square::G4));
        assert!(queen.contains(&Square::B2));
        assert!(!queen.contains(&Square::A1));
        assert!(queen.contains(&Square::H8));
        assert!(!queen.contains(&Square::E6));

        let board = setup(&[(Square::C1, 'B'), (Square::D2, 'P')]);
        assert_eq!(reachable(&board, Square::C1), vec![Square::B2, Square::A3]);

        let board = setup(&[(Square::A1, 'r'), (Square::A3, 'r'), (Square::C1, 'N')]);
        assert_eq!(
            reachable(&board, Square::A1),
            vec![Square::B1, Square::C1, Square::A2]
        );
    }

    #[test]
    fn pawn_pushes() {
        let board = Board::starting();
        assert_eq!(reachable(&board, Square::E2), vec![Square::E3, Square::E4]);
        assert_eq!(reachable(&board, Square::D7), vec![Square::D5, Square::D6]);

        // Blocked pawns can not push, not even by two squares.
        let board = setup(&[(Square::E2, 'P'), (Square::E3, 'n')]);
        assert!(reachable(&board, Square::E2).is_empty());
        let board = setup(&[(Square::E2, 'P'), (Square::E4, 'n')]);
        assert_eq!(reachable(&board, Square::E2), vec![Square::E3]);

        // Pawns that have moved already push by a single square.
        let mut board = setup(&[(Square::E2, 'P')]);
        let pawn = board[Square::E2].map(Piece::moved);
        board.place(Square::E2, pawn);
        assert_eq!(reachable(&board, Square::E2), vec![Square::E3]);
    }

    #[test]
    fn pawn_captures() {
        let board = setup(&[
            (Square::E4, 'P'),
            (Square::D5, 'p'),
            (Square::F5, 'N'),
            (Square::E5, 'p'),
        ]);
        assert_eq!(reachable(&board, Square::E4), vec![Square::D5]);
        // Black pawns capture towards rank 1.
        assert_eq!(reachable(&board, Square::D5), vec![Square::D4, Square::E4]);
    }

    #[test]
    fn en_passant() {
        let mut board = setup(&[(Square::E5, 'P'), (Square::D5, 'p'), (Square::F5, 'p')]);
        assert_eq!(reachable(&board, Square::E5), vec![Square::E6]);
        let mut pawn = board[Square::D5].unwrap().moved();
        pawn.set_en_passant(true);
        board.place(Square::D5, Some(pawn));
        assert_eq!(reachable(&board, Square::E5), vec![Square::D6, Square::E6]);
    }

    #[test]
    fn king() {
        let board = setup(&[(Square::E1, 'K'), (Square::D2, 'P'), (Square::F2, 'p')]);
        assert_eq!(
            reachable(&board, Square::E1),
            vec![Square::D1, Square::F1, Square::E2, Square::F2]
        );
    }

    #[test]
    fn castling() {
        let board = setup(&[
            (Square::E1, 'K'),
            (Square::H1, 'R'),
            (Square::A1, 'R'),
            (Square::B1, 'N'),
        ]);
        assert!(is_castling(&board, Square::E1, Square::H1));
        assert!(can_reach(&board, Square::E1, Square::H1));
        // Queenside is blocked by the knight.
        assert!(!is_castling(&board, Square::E1, Square::A1));
        assert!(!can_reach(&board, Square::E1, Square::A1));

        // Moved rook can not castle.
        let mut board = board;
        let rook = board[Square::H1].map(Piece::moved);
        board.place(Square::H1, rook);
        assert!(!can_reach(&board, Square::E1, Square::H1));

        // Neither can a moved king.
        let board = setup(&[(Square::E8, 'k'), (Square::A8, 'r')]);
        assert!(can_reach(&board, Square::E8, Square::A8));
        let mut moved = board.clone();
        moved.place(
            Square::E8,
            Some(Piece::new(Player::Black, PieceKind::King).moved()),
        );
        assert!(!can_reach(&moved, Square::E8, Square::A8));

        // Unmoved pieces off their home squares do not castle either.
        let board = setup(&[(Square::G1, 'K'), (Square::H1, 'R')]);
        assert!(!is_castling(&board, Square::G1, Square::H1));
        let board = setup(&[(Square::B1, 'K'), (Square::H1, 'R'), (Square::A1, 'R')]);
        assert!(!is_castling(&board, Square::B1, Square::H1));
        assert!(!is_castling(&board, Square::B1, Square::A1));
    }
}
