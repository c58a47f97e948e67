use crate::board::{Board, Player, TileId};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The mark that opens every game.
pub const FIRST_TURN: Player = Player::X;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Conclusion {
    Win { player: Player, line: [TileId; 3] },
    Draw,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    Concluded(Conclusion),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TurnResult {
    /// The move broke a rule; nothing changed.
    Rejected,
    NextTurn(Player),
    Concluded(Conclusion),
}

/// Rules and state for a single board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Player,
    status: Status,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            turn: FIRST_TURN,
            status: Status::InProgress,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn whos_turn(&self) -> Player {
        self.turn
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == Status::InProgress
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Marks `index` for `player` if the move is legal.
    ///
    /// Out-of-range tiles, occupied tiles, moves out of turn and moves after
    /// the game concluded all come back as [`TurnResult::Rejected`] with the
    /// game untouched.
    pub fn apply_move(&mut self, index: usize, player: Player) -> TurnResult {
        let Some(tile) = TileId::new(index) else {
            trace!(index, "move off the board");
            return TurnResult::Rejected;
        };
        if !self.is_valid_mark(tile, player) {
            trace!(%tile, %player, "move rejected");
            return TurnResult::Rejected;
        }

        self.board.mark(tile, player);
        debug!(%tile, %player, "tile marked");
        self.evaluate_outcome()
    }

    fn evaluate_outcome(&mut self) -> TurnResult {
        let conclusion = if let Some((player, line)) = self.board.winning_line() {
            Some(Conclusion::Win { player, line })
        } else if self.board.is_full() {
            Some(Conclusion::Draw)
        } else {
            None
        };

        match conclusion {
            Some(conclusion) => {
                self.status = Status::Concluded(conclusion);
                debug!(?conclusion, "game concluded");
                TurnResult::Concluded(conclusion)
            }
            None => {
                self.turn = !self.turn;
                TurnResult::NextTurn(self.turn)
            }
        }
    }

    fn is_valid_mark(&self, tile: TileId, player: Player) -> bool {
        self.is_in_progress() && self.turn == player && self.board[tile].is_none()
    }

    /// Picks an empty tile uniformly at random for `ai`, if it is `ai`'s move.
    pub fn choose_ai_move<R: Rng + ?Sized>(&self, ai: Player, rng: &mut R) -> Option<TileId> {
        if !self.is_in_progress() || self.turn != ai {
            return None;
        }
        self.board.empty_tiles().choose(rng).copied()
    }

    pub fn play_ai_move<R: Rng + ?Sized>(
        &mut self,
        ai: Player,
        rng: &mut R,
    ) -> Option<(TileId, TurnResult)> {
        let tile = self.choose_ai_move(ai, rng)?;
        Some((tile, self.apply_move(tile.index(), ai)))
    }
}
