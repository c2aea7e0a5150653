//! Implementation of chess rules: board, piece geometry, check detection and
//! the game state machine built on top of them.

pub mod board;
pub mod core;
pub mod error;
pub mod game;
pub mod geometry;
pub mod moves;
pub mod rules;
mod speculation;
