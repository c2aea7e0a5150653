//! Errors surfaced to the callers of the game API.
//!
//! Rejected moves are not errors: they are reported as
//! [`crate::chess::game::MoveOutcome`] values so that the caller can simply try
//! another move.

/// Caller errors that can not be expressed as a move outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Coordinates do not describe a square of the 8×8 board.
    #[error("square ({file}, {rank}) is outside of the board: coordinates should be within 0..BOARD_WIDTH")]
    OutOfBounds {
        #[allow(missing_docs)]
        file: u8,
        #[allow(missing_docs)]
        rank: u8,
    },
}
