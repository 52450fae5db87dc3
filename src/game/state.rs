use crate::error::{BoardError, GameError, SnapshotError};

use super::{check_winner, Board, MoveHistory, Player};

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Waiting for the given player to move.
    InProgress(Player),
    /// Frozen until reset.
    Won(Player),
}

/// Complete game state, and the unit of persistence.
///
/// Transitions never mutate `self`; they return the next state so callers can
/// swap it in as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    winner: Option<Player>,
    history: MoveHistory,
}

impl GameState {
    /// Create initial game state on a board of the given size
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        Ok(Self::with_board(Board::new(rows, cols)?))
    }

    /// Create initial game state on the standard 6x7 board
    pub fn initial() -> Self {
        Self::with_board(Board::standard())
    }

    fn with_board(board: Board) -> Self {
        GameState {
            board,
            current_player: Player::FIRST,
            winner: None,
            history: MoveHistory::new(),
        }
    }

    /// Rebuild a state from stored parts.
    ///
    /// The history is replayed from an empty board; the result must reproduce
    /// the stored board, winner and turn exactly.
    pub fn from_parts(
        board: Board,
        current_player: Player,
        winner: Option<Player>,
        history: MoveHistory,
    ) -> Result<Self, SnapshotError> {
        if history.len() != board.occupied_count() {
            return Err(SnapshotError::Corrupt(format!(
                "history has {} moves but the board holds {} pieces",
                history.len(),
                board.occupied_count()
            )));
        }

        let mut replay = Self::with_board(board.cleared());
        for (index, &column) in history.as_slice().iter().enumerate() {
            replay = replay.apply_move(column).map_err(|e| {
                SnapshotError::Corrupt(format!("move {index} (column {column}) cannot be replayed: {e}"))
            })?;
        }

        if replay.board != board {
            return Err(SnapshotError::Corrupt(
                "board does not match its move history".into(),
            ));
        }
        if replay.winner != winner {
            return Err(SnapshotError::Corrupt(
                "recorded winner does not match the board".into(),
            ));
        }
        if replay.current_player != current_player {
            return Err(SnapshotError::Corrupt(
                "current player does not match the move history".into(),
            ));
        }

        Ok(replay)
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn status(&self) -> GameStatus {
        match self.winner {
            Some(winner) => GameStatus::Won(winner),
            None => GameStatus::InProgress(self.current_player),
        }
    }

    /// Board is full and nobody won
    pub fn is_draw(&self) -> bool {
        self.winner.is_none() && self.board.is_full()
    }

    /// Get list of playable columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.winner.is_some() {
            return Vec::new();
        }

        (0..self.board.cols())
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameAlreadyWon);
        }

        let (board, _row) = self.board.drop_piece(column, self.current_player)?;
        let mut history = self.history.clone();
        history.record(column);

        Ok(GameState {
            winner: check_winner(&board, self.current_player),
            board,
            current_player: self.current_player.other(),
            history,
        })
    }

    /// Take back the most recent move. Returns the new state and the column
    /// that was undone; the turn goes back to whoever played it.
    pub fn undo(&self) -> Result<(GameState, usize), GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameAlreadyWon);
        }

        let mut history = self.history.clone();
        let column = history.undo().map_err(|_| GameError::NothingToUndo)?;

        let mover = self
            .board
            .top_row(column)
            .and_then(|row| self.board.get(row, column).player())
            .ok_or(GameError::NothingToUndo)?;
        let board = self
            .board
            .remove_top_piece(column)
            .ok_or(GameError::NothingToUndo)?;

        Ok((
            GameState {
                board,
                current_player: mover,
                winner: None,
                history,
            },
            column,
        ))
    }

    /// Fresh game on a board of the same size. Red always opens.
    pub fn reset(&self) -> GameState {
        Self::with_board(self.board.cleared())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
