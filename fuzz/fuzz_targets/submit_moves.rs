#![no_main]
use gambit::chess::core::{PieceKind, Player, Square};
use gambit::{Game, MoveOutcome, Participant};
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position, Role};

fn square(byte: u8) -> Square {
    Square::from_coordinates(byte & 7, (byte >> 3) & 7).expect("both coordinates are below 8")
}

// Every pair of bytes is a move attempt from whoever is to move. Rejected
// attempts must leave the game untouched, accepted ones must be legal
// according to shakmaty.
fuzz_target!(|data: &[u8]| {
    let white = Participant::new("white", Player::White);
    let black = Participant::new("black", Player::Black);
    let mut game = Game::new(white, black).expect("sides are different");
    let mut reference = Chess::default();

    for (&from, &to) in data.iter().tuples() {
        let (from, to) = (square(from), square(to));
        let player = game.participant(game.side_to_move()).clone();
        let before = game.clone();
        let outcome = game.play(&player, from, to);

        let uci = format!("{from}{to}");
        let reference_move = reference.legal_moves().into_iter().find(|m| {
            m.to_uci(CastlingMode::Chess960).to_string().starts_with(&uci)
                && m.promotion().map_or(true, |role| role == Role::Queen)
        });

        match (outcome, reference_move) {
            (MoveOutcome::Success, Some(m)) => reference.play_unchecked(&m),
            (MoveOutcome::Success, None) => panic!("{uci} is illegal:\n{}", before.board()),
            (_, Some(_)) => {
                panic!("{uci} is legal but got {outcome:?}:\n{}", before.board())
            },
            (_, _) => {
                assert_eq!(game.board(), before.board());
                assert_eq!(game.history(), before.history());
                assert_eq!(game.side_to_move(), before.side_to_move());
            },
        }

        for side in [Player::White, Player::Black] {
            assert_eq!(game.board().count(side, PieceKind::King), 1);
        }
        assert_eq!(game.in_check(), reference.is_check());
        assert_eq!(game.is_over(), reference.legal_moves().is_empty());
    }
});
