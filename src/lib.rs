//! Chess rules engine: enforces legal play between two participants on a
//! standard 8×8 board, tracks whose turn it is and detects the end of the game
//! (checkmate, stalemate and the defensive king-capture win).
//!
//! The entry point is [`Game`]:
//!
//! ```
//! use gambit::{Game, GameStatus, MoveOutcome, Participant, Player};
//!
//! let white = Participant::new("Alice", Player::White);
//! let black = Participant::new("Bob", Player::Black);
//! let mut game = Game::new(white.clone(), black).expect("participants play different sides");
//!
//! // 1. e4
//! assert_eq!(game.submit_move(&white, 4, 1, 4, 3), Ok(MoveOutcome::Success));
//! assert_eq!(game.status(), GameStatus::Active);
//! assert_eq!(game.history().len(), 1);
//! ```

#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![deny(clippy::perf)]

pub mod chess;

pub use chess::board::Board;
pub use chess::core::{Piece, PieceKind, Player, Promotion, Square};
pub use chess::error::Error;
pub use chess::game::{Game, GameOptions, GameStatus, MoveOutcome, Participant};
pub use chess::moves::{Move, MoveFlags};
