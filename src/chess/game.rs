//! Game state: the board, the participants, turn order, history of committed
//! moves and the outcome of the game.
//!
//! [`Game::play`] is the only way to change the board: it validates the move
//! against the rules, commits it (together with the side effects of castling,
//! en passant and promotion) and re-evaluates whether the game is over.

use std::fmt;

use anyhow::bail;
use tracing::{debug, info, instrument, warn};

use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Player, Promotion, Rank, Square};
use crate::chess::error::Error;
use crate::chess::geometry::can_reach;
use crate::chess::moves::{Move, MoveFlags};
use crate::chess::rules::{self, castle_path_safe, king_in_checkmate, king_in_danger, Ply, PlyKind};
use crate::chess::speculation::Speculation;

/// Somebody playing one side of the game. The engine does not track sessions
/// or accounts: a name and a side is all it needs to check turn ownership.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Participant {
    name: String,
    side: Player,
}

impl Participant {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(name: impl Into<String>, side: Player) -> Self {
        Self {
            name: name.into(),
            side,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The color of the pieces this participant moves.
    #[must_use]
    pub const fn side(&self) -> Player {
        self.side
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.side)
    }
}

/// Once the game leaves [`GameStatus::Active`], the status never changes
/// again.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameStatus {
    #[default]
    Active,
    Stalemate,
    WhiteWin,
    BlackWin,
}

impl GameStatus {
    #[must_use]
    const fn won_by(player: Player) -> Self {
        match player {
            Player::White => Self::WhiteWin,
            Player::Black => Self::BlackWin,
        }
    }

    /// Whether the game has ended.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Active)
    }

    /// The side that won the game, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::WhiteWin => Some(Player::White),
            Self::BlackWin => Some(Player::Black),
            Self::Active | Self::Stalemate => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Stalemate => "stalemate",
            Self::WhiteWin => "white wins",
            Self::BlackWin => "black wins",
        })
    }
}

/// Result of a move submission. Rejections are regular values: the board is
/// left untouched and the same player can try another move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The move was committed and the turn passed to the opponent.
    Success,
    /// The source square is empty.
    NoPieceAtSource,
    /// It is not this participant's turn or the piece belongs to the
    /// opponent.
    WrongTurn,
    /// The destination is occupied by a piece of the same color.
    SameSideCapture,
    /// The piece can not travel to the destination.
    IllegalGeometry,
    /// The move would leave the mover's king attacked (this includes castling
    /// out of check or through an attacked square).
    OwnKingExposed,
    /// The game has already ended.
    GameOver,
}

impl MoveOutcome {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Knobs of the rules that differ between variations of play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameOptions {
    /// The piece pawns turn into upon reaching the last rank.
    pub promotion: Promotion,
}

/// A game of chess between two participants.
///
/// ```
/// use gambit::{Game, GameStatus, MoveOutcome, Participant, Player, Square};
///
/// let white = Participant::new("Alice", Player::White);
/// let black = Participant::new("Bob", Player::Black);
/// let mut game = Game::new(white.clone(), black.clone()).unwrap();
///
/// // Fool's mate.
/// for (player, from, to) in [
///     (&white, Square::F2, Square::F3),
///     (&black, Square::E7, Square::E5),
///     (&white, Square::G2, Square::G4),
///     (&black, Square::D8, Square::H4),
/// ] {
///     assert_eq!(game.play(player, from, to), MoveOutcome::Success);
/// }
/// assert_eq!(game.status(), GameStatus::BlackWin);
/// assert!(game.history().last().unwrap().gives_check());
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    white: Participant,
    black: Participant,
    side_to_move: Player,
    history: Vec<Move>,
    status: GameStatus,
    options: GameOptions,
}

impl Game {
    /// Starts a game from the standard layout with White to move.
    ///
    /// # Errors
    ///
    /// Both participants play the same side.
    pub fn new(first: Participant, second: Participant) -> anyhow::Result<Self> {
        Self::with_options(first, second, GameOptions::default())
    }

    /// Same as [`Game::new`] with non-default rules.
    ///
    /// # Errors
    ///
    /// Both participants play the same side.
    pub fn with_options(
        first: Participant,
        second: Participant,
        options: GameOptions,
    ) -> anyhow::Result<Self> {
        let (white, black) = seat(first, second)?;
        Ok(Self {
            board: Board::starting(),
            white,
            black,
            side_to_move: Player::White,
            history: Vec::new(),
            status: GameStatus::Active,
            options,
        })
    }

    /// Resets the game: fresh board, new participants, empty history, White
    /// to move. The options are kept.
    ///
    /// # Errors
    ///
    /// Both participants play the same side. The game is left as is.
    pub fn initialize(&mut self, first: Participant, second: Participant) -> anyhow::Result<()> {
        *self = Self::with_options(first, second, self.options)?;
        info!(white = %self.white, black = %self.black, "game initialized");
        Ok(())
    }

    /// Continues the game from an arbitrary position. The position might
    /// already be terminal: the status reflects that right away.
    ///
    /// # Errors
    ///
    /// The participants play the same side or the position can not occur in a
    /// game of chess:
    ///
    /// - Each side has to have exactly one king, at most 8 pawns and at most
    ///   16 pieces.
    /// - Pawns can not be placed on the backranks.
    /// - The side that has just moved can not be in check.
    /// - The side to move can not be checked by more than two pieces.
    pub fn from_board(
        board: Board,
        first: Participant,
        second: Participant,
        side_to_move: Player,
    ) -> anyhow::Result<Self> {
        let (white, black) = seat(first, second)?;
        validate(&board, side_to_move)?;
        let mut game = Self {
            board,
            white,
            black,
            side_to_move,
            history: Vec::new(),
            status: GameStatus::Active,
            options: GameOptions::default(),
        };
        game.refresh_status();
        Ok(game)
    }

    /// Submits a move given zero-based `(file, rank)` coordinates.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if any coordinate is outside of the board. All
    /// rule violations are reported through [`MoveOutcome`] instead.
    #[instrument(level = "debug", skip(self, player), fields(player = %player))]
    pub fn submit_move(
        &mut self,
        player: &Participant,
        from_file: u8,
        from_rank: u8,
        to_file: u8,
        to_rank: u8,
    ) -> Result<MoveOutcome, Error> {
        let from = Board::square_at(from_file, from_rank)?;
        let to = Board::square_at(to_file, to_rank)?;
        Ok(self.play(player, from, to))
    }

    /// Validates the move and commits it if it is legal. Castling is
    /// submitted as the king moving onto its own rook.
    #[instrument(level = "debug", skip(self, player), fields(player = %player))]
    pub fn play(&mut self, player: &Participant, from: Square, to: Square) -> MoveOutcome {
        if self.status.is_over() {
            return reject(MoveOutcome::GameOver);
        }
        let Some(piece) = self.board[from] else {
            return reject(MoveOutcome::NoPieceAtSource);
        };
        if player != self.participant(self.side_to_move) || piece.owner != player.side() {
            return reject(MoveOutcome::WrongTurn);
        }
        if !can_reach(&self.board, from, to) {
            return reject(match self.board[to] {
                Some(target) if target.owner == piece.owner => MoveOutcome::SameSideCapture,
                _ => MoveOutcome::IllegalGeometry,
            });
        }

        let ply = Ply::classify(&self.board, from, to);
        let mut record = Move::new(piece.owner, piece, from, to);
        match ply.kind {
            PlyKind::Castle { king_to, rook_to } => {
                if !castle_path_safe(&mut self.board, from, rook_to, piece.owner) {
                    return reject(MoveOutcome::OwnKingExposed);
                }
                record.set_castle(king_to, to, rook_to);
            },
            PlyKind::EnPassant { .. } => record.insert_flags(MoveFlags::EN_PASSANT),
            PlyKind::Regular => (),
        }
        if let Some((square, captured)) = ply.captured(&self.board) {
            record.set_captured(square, captured);
        }

        // Any king move, castling or not, spends the right to castle.
        let mut placed = piece.moved();
        if piece.kind == PieceKind::Pawn {
            let (_, from_rank) = from.coordinates();
            let (_, to_rank) = to.coordinates();
            placed.set_en_passant(from_rank.abs_diff(to_rank) == 2);
            if to.rank() == Rank::backrank(piece.owner.opponent()) {
                placed = piece.promote(self.options.promotion);
                record.set_promotion(self.options.promotion);
            }
        }

        let mut speculation = Speculation::new(&mut self.board);
        ply.apply(&mut speculation, placed);
        if king_in_danger(&speculation, piece.owner) {
            return reject(MoveOutcome::OwnKingExposed);
        }
        speculation.commit();

        self.expire_en_passant();
        match record.captured() {
            Some((square, captured)) if captured.kind == PieceKind::King => {
                warn!(%square, winner = %piece.owner, "king was captured");
                self.status = GameStatus::won_by(piece.owner);
            },
            _ => {
                if king_in_danger(&self.board, piece.owner.opponent()) {
                    record.insert_flags(MoveFlags::CHECK);
                }
            },
        }
        debug!(%record, flags = ?record.flags(), "move committed");
        self.history.push(record);
        self.side_to_move = self.side_to_move.opponent();
        self.refresh_status();
        MoveOutcome::Success
    }

    /// Pawns can only be captured en passant right after the double push:
    /// the opponent's eligibility is gone once they have made their next
    /// move.
    fn expire_en_passant(&mut self) {
        let Some(last) = self.history.last() else {
            return;
        };
        let square = last.to();
        if let Some(mut pawn) = self.board[square] {
            if pawn.owner == last.side() && pawn.en_passant_eligible() {
                pawn.set_en_passant(false);
                self.board.place(square, Some(pawn));
            }
        }
    }

    /// Detects checkmate and stalemate for the side to move.
    ///
    /// Check has to be tested before looking for legal moves: a player
    /// without legal moves is checkmated while in check and stalemated
    /// otherwise, and reporting both would be wrong.
    fn refresh_status(&mut self) {
        if self.status.is_over() {
            return;
        }
        let player = self.side_to_move;
        if king_in_danger(&self.board, player) {
            if king_in_checkmate(&mut self.board, player) {
                self.status = GameStatus::won_by(player.opponent());
                info!(winner = %player.opponent(), moves = self.history.len(), "checkmate");
            }
        } else if rules::is_stalemate(&mut self.board, player) {
            self.status = GameStatus::Stalemate;
            info!(moves = self.history.len(), "stalemate");
        }
    }

    /// Legal destinations of the piece on `(file, rank)` as `(file, rank)`
    /// pairs, file by file. Empty square yields no
    /// destinations.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if the coordinates are outside of the board.
    pub fn legal_destinations(&self, file: u8, rank: u8) -> Result<Vec<(u8, u8)>, Error> {
        let from = Board::square_at(file, rank)?;
        Ok(self
            .destinations(from)
            .into_iter()
            .map(Square::coordinates)
            .collect())
    }

    /// Legal destinations of the piece on `from`, file by file.
    #[must_use]
    pub fn destinations(&self, from: Square) -> Vec<Square> {
        rules::legal_destinations(&mut self.board.clone(), from)
    }

    /// All legal moves of the side to move, grouped by the file of the moving
    /// piece. There are none once the game is over.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<(Square, Square)> {
        if self.status.is_over() {
            return Vec::new();
        }
        let mut board = self.board.clone();
        let pieces: Vec<Square> = rules::by_file()
            .filter(|&square| board[square].is_some_and(|piece| piece.owner == self.side_to_move))
            .collect();
        pieces
            .into_iter()
            .flat_map(|from| {
                rules::legal_destinations(&mut board, from)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }

    /// Whether the king of the side to move is attacked.
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.board.king(self.side_to_move).is_some()
            && king_in_danger(&self.board, self.side_to_move)
    }

    /// The participant whose turn it is. Re-evaluates the status of the game
    /// first.
    pub fn current_player(&mut self) -> &Participant {
        self.refresh_status();
        self.participant(self.side_to_move)
    }

    /// The participant playing `side`.
    #[must_use]
    pub const fn participant(&self, side: Player) -> &Participant {
        match side {
            Player::White => &self.white,
            Player::Black => &self.black,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Committed moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn options(&self) -> GameOptions {
        self.options
    }
}

fn reject(outcome: MoveOutcome) -> MoveOutcome {
    debug!(?outcome, "move rejected");
    outcome
}

/// Orders the participants as (White, Black).
fn seat(first: Participant, second: Participant) -> anyhow::Result<(Participant, Participant)> {
    if first.side == second.side {
        bail!(
            "participants should play different sides, both {} and {} play {}",
            first.name,
            second.name,
            first.side
        );
    }
    Ok(match first.side {
        Player::White => (first, second),
        Player::Black => (second, first),
    })
}

fn validate(board: &Board, side_to_move: Player) -> anyhow::Result<()> {
    for player in [Player::White, Player::Black] {
        let kings = board.count(player, PieceKind::King);
        if kings != 1 {
            bail!("expected 1 {player} king, got {kings}");
        }
        let pawns = board.count(player, PieceKind::Pawn);
        if pawns > 8 {
            bail!("expected at most 8 {player} pawns, got {pawns}");
        }
        let pieces = board.player_pieces(player).count();
        if pieces > 16 {
            bail!("expected at most 16 {player} pieces, got {pieces}");
        }
    }
    if board.pieces().any(|(square, piece)| {
        piece.kind == PieceKind::Pawn && matches!(square.rank(), Rank::One | Rank::Eight)
    }) {
        bail!("pawns can not be placed on backranks");
    }
    if king_in_danger(board, side_to_move.opponent()) {
        bail!(
            "{} king is attacked while it is {side_to_move} to move",
            side_to_move.opponent()
        );
    }
    let Some(king) = board.king(side_to_move) else {
        unreachable!("kings are counted above");
    };
    let checkers = rules::attackers(board, king, side_to_move.opponent()).count();
    if checkers > 2 {
        bail!("{side_to_move} king can not be checked by {checkers} pieces");
    }
    Ok(())
}
