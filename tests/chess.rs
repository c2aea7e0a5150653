use gambit::chess::core::{Piece, PieceKind, Player, Square};
use gambit::{Board, Error, Game, GameStatus, MoveOutcome, Participant};
use pretty_assertions::assert_eq;
use strum::IntoEnumIterator;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn participants() -> (Participant, Participant) {
    (
        Participant::new("Alice", Player::White),
        Participant::new("Bob", Player::Black),
    )
}

fn new_game() -> Game {
    init_logging();
    let (white, black) = participants();
    Game::new(white, black).expect("participants play different sides")
}

fn setup(pieces: &[(&str, char)], side_to_move: Player) -> Game {
    init_logging();
    let mut board = Board::empty();
    for &(square, symbol) in pieces {
        board.place(
            Square::try_from(square).unwrap(),
            Some(Piece::try_from(symbol).unwrap()),
        );
    }
    let (white, black) = participants();
    Game::from_board(board, white, black, side_to_move).expect("valid position")
}

fn squares(uci: &str) -> (Square, Square) {
    (
        Square::try_from(&uci[..2]).unwrap(),
        Square::try_from(&uci[2..4]).unwrap(),
    )
}

/// Plays the moves in UCI notation on behalf of whoever is to move and checks
/// the invariants that hold after every committed move.
fn play_line(game: &mut Game, moves: &[&str]) {
    for uci in moves {
        let player = game.participant(game.side_to_move()).clone();
        let (from, to) = squares(uci);
        assert_eq!(game.play(&player, from, to), MoveOutcome::Success, "{uci}");

        for side in [Player::White, Player::Black] {
            assert_eq!(game.board().count(side, PieceKind::King), 1, "{uci}");
        }
        let last = game.history().last().unwrap();
        assert_eq!(last.gives_check(), game.in_check(), "{uci}");
    }
}

#[test]
fn fools_mate() {
    let mut game = new_game();
    let (white, black) = participants();
    for (player, from_file, from_rank, to_file, to_rank) in [
        (&white, 5, 1, 5, 2),
        (&black, 4, 6, 4, 4),
        (&white, 6, 1, 6, 3),
        (&black, 3, 7, 7, 3),
    ] {
        assert_eq!(
            game.submit_move(player, from_file, from_rank, to_file, to_rank),
            Ok(MoveOutcome::Success)
        );
    }
    assert_eq!(game.status(), GameStatus::BlackWin);
    assert!(game.in_check());
    assert_eq!(game.current_player(), &white);
    assert_eq!(game.status(), GameStatus::BlackWin);
    assert_eq!(
        game.history()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["f2f3", "e7e5", "g2g4", "d8h4"]
    );
    assert_eq!(
        game.submit_move(&white, 4, 1, 4, 3),
        Ok(MoveOutcome::GameOver)
    );
    assert_eq!(game.history().len(), 4);
}

#[test]
fn scholars_mate() {
    let mut game = new_game();
    play_line(
        &mut game,
        &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
    );
    assert_eq!(game.status(), GameStatus::WhiteWin);
    let last = game.history().last().unwrap();
    assert!(last.gives_check());
    assert_eq!(
        last.captured(),
        Some((Square::F7, Piece::new(Player::Black, PieceKind::Pawn)))
    );
    assert!(game.legal_moves().is_empty());
}

#[test]
fn stalemate_is_not_a_win() {
    let mut game = setup(&[("c7", 'K'), ("d4", 'Q'), ("a8", 'k')], Player::White);
    assert_eq!(game.status(), GameStatus::Active);
    play_line(&mut game, &["d4b6"]);
    assert_eq!(game.status(), GameStatus::Stalemate);
    assert_eq!(game.status().winner(), None);
    assert!(!game.in_check());
    let (_, black) = participants();
    assert_eq!(game.current_player(), &black);
    assert_eq!(game.status(), GameStatus::Stalemate);
    assert_eq!(
        game.play(&black, Square::A8, Square::A7),
        MoveOutcome::GameOver
    );
}

#[test]
fn en_passant_window() {
    let mut game = new_game();
    play_line(&mut game, &["e2e4", "b8c6", "e4e5", "d7d5"]);
    assert_eq!(game.destinations(Square::E5), vec![Square::D6, Square::E6]);

    // Captured right away: the bypassed pawn leaves the board.
    let mut capture = game.clone();
    play_line(&mut capture, &["e5d6"]);
    assert_eq!(capture.board()[Square::D5], None);
    assert_eq!(capture.board()[Square::D6].map(|piece| piece.owner), Some(Player::White));
    assert_eq!(capture.board().count(Player::Black, PieceKind::Pawn), 7);
    let last = capture.history().last().unwrap();
    assert!(last.is_en_passant());
    assert_eq!(last.captured().map(|(square, _)| square), Some(Square::D5));

    // One move later the window is closed.
    play_line(&mut game, &["b1c3", "a7a6"]);
    assert_eq!(game.destinations(Square::E5), vec![Square::E6]);
    let (white, _) = participants();
    assert_eq!(
        game.play(&white, Square::E5, Square::D6),
        MoveOutcome::IllegalGeometry
    );
}

#[test]
fn kingside_castle() {
    let mut game = new_game();
    play_line(
        &mut game,
        &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"],
    );
    assert!(game.destinations(Square::E1).contains(&Square::H1));
    play_line(&mut game, &["e1h1"]);

    let board = game.board();
    assert_eq!(board[Square::G1].map(|piece| piece.kind), Some(PieceKind::King));
    assert_eq!(board[Square::F1].map(|piece| piece.kind), Some(PieceKind::Rook));
    assert_eq!(board[Square::E1], None);
    assert_eq!(board[Square::H1], None);
    assert!(board[Square::G1].unwrap().has_moved());

    let last = game.history().last().unwrap();
    assert!(last.is_castle());
    assert_eq!(last.from(), Square::E1);
    assert_eq!(last.to(), Square::G1);
    assert_eq!(last.castled_rook(), Some((Square::H1, Square::F1)));
    assert_eq!(last.captured(), None);
}

#[test]
fn queenside_castle() {
    let mut game = new_game();
    play_line(
        &mut game,
        &[
            "d2d4", "d7d5", "b1c3", "b8c6", "c1f4", "c8f5", "d1d2", "d8d7", "e1a1", "e8a8",
        ],
    );
    let board = game.board();
    assert_eq!(board[Square::C1].map(|piece| piece.kind), Some(PieceKind::King));
    assert_eq!(board[Square::D1].map(|piece| piece.kind), Some(PieceKind::Rook));
    assert_eq!(board[Square::C8].map(|piece| piece.kind), Some(PieceKind::King));
    assert_eq!(board[Square::D8].map(|piece| piece.kind), Some(PieceKind::Rook));
    assert_eq!(
        game.history()
            .iter()
            .rev()
            .take(2)
            .map(|m| m.castled_rook())
            .collect::<Vec<_>>(),
        vec![Some((Square::A8, Square::D8)), Some((Square::A1, Square::D1))]
    );
}

#[test]
fn promotion_yields_queen() {
    let mut game = setup(&[("e1", 'K'), ("a7", 'P'), ("h8", 'k')], Player::White);
    play_line(&mut game, &["a7a8", "h8h7"]);
    assert_eq!(
        game.board()[Square::A8],
        Some(Piece::new(Player::White, PieceKind::Queen).moved())
    );
    assert!(game.history()[0].is_promotion());

    let destinations = game.destinations(Square::A8);
    assert_eq!(destinations.len(), 21);
    for square in [Square::A1, Square::H8, Square::H1, Square::B7] {
        assert!(destinations.contains(&square), "{square}");
    }
}

#[test]
fn rejections_leave_game_untouched() {
    let mut game = new_game();
    // White can capture en passant and both sides can castle soon.
    play_line(
        &mut game,
        &["e2e4", "e7e6", "g1f3", "b8c6", "f1e2", "g8e7", "e4e5", "d7d5"],
    );
    let player = game.participant(game.side_to_move()).clone();
    let mut accepted = Vec::new();
    for from in Square::iter() {
        for to in Square::iter() {
            let mut probe = game.clone();
            let outcome = probe.play(&player, from, to);
            if outcome == MoveOutcome::Success {
                accepted.push((from, to));
                assert_eq!(probe.history().len(), game.history().len() + 1);
            } else {
                assert_eq!(probe.board(), game.board(), "{from}{to}: {outcome:?}");
                assert_eq!(probe.history(), game.history());
                assert_eq!(probe.side_to_move(), game.side_to_move());
            }
        }
    }
    let mut legal = game.legal_moves();
    legal.sort();
    assert_eq!(accepted, legal);
    assert!(accepted.contains(&(Square::E1, Square::H1)));
    assert!(accepted.contains(&(Square::E5, Square::D6)));
}

#[test]
fn legal_destinations_are_idempotent() {
    let mut game = new_game();
    play_line(&mut game, &["e2e4", "e7e5", "d1h5"]);
    let snapshot = game.board().clone();
    let first = game.legal_destinations(5, 6).unwrap();
    let second = game.legal_destinations(5, 6).unwrap();
    assert_eq!(first, second);
    // The f7 pawn is pinned to its king.
    assert!(first.is_empty());
    assert_eq!(game.board(), &snapshot);
    assert_eq!(
        game.legal_destinations(6, 7).unwrap(),
        vec![(4, 6), (5, 5), (7, 5)]
    );
}

#[test]
fn out_of_bounds() {
    let mut game = new_game();
    let (white, _) = participants();
    assert_eq!(
        game.submit_move(&white, 4, 1, 4, 8),
        Err(Error::OutOfBounds { file: 4, rank: 8 })
    );
    assert_eq!(
        game.legal_destinations(8, 8),
        Err(Error::OutOfBounds { file: 8, rank: 8 })
    );
    assert_eq!(
        game.submit_move(&white, 4, 1, 4, 8).unwrap_err().to_string(),
        "square (4, 8) is outside of the board: coordinates should be within 0..BOARD_WIDTH"
    );
    assert_eq!(game.board(), &Board::starting());
}

#[test]
fn check_must_be_answered() {
    let mut game = new_game();
    play_line(&mut game, &["e2e4", "f7f6", "d1h5"]);
    assert!(game.in_check());
    let (_, black) = participants();
    assert_eq!(
        game.play(&black, Square::A7, Square::A6),
        MoveOutcome::OwnKingExposed
    );
    assert_eq!(
        game.legal_moves(),
        vec![(Square::G7, Square::G6)]
    );
    play_line(&mut game, &["g7g6"]);
    assert_eq!(game.status(), GameStatus::Active);
}
