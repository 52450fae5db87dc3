use std::path::PathBuf;
use std::time::Duration;

/// Errors raised when constructing a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board must be at least {min}x{min}, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize, min: usize },

    #[error("board must be at most {max}x{max}, got {rows}x{cols}")]
    TooLarge { rows: usize, cols: usize, max: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("piece at row {row}, column {col} is floating above an empty cell")]
    Floating { row: usize, col: usize },
}

/// Reasons a piece cannot be dropped into a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// Errors reported by game operations. None of them change the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveError),

    #[error("no moves to undo")]
    NothingToUndo,

    #[error("game is already won, reset to play again")]
    GameAlreadyWon,

    #[error("another operation is in progress")]
    Busy,
}

/// Errors from a single remote or local store call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store did not respond within {0:?}")]
    Timeout(Duration),

    #[error("invalid store key {0:?}")]
    Rejected(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors decoding a stored snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}

impl From<BoardError> for SnapshotError {
    fn from(err: BoardError) -> Self {
        SnapshotError::Corrupt(err.to_string())
    }
}

/// Errors surfaced by the persistence synchronizer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("no saved game found")]
    NotFound,

    #[error("failed to write local store: {0}")]
    Local(#[source] StoreError),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from the controller's save and load operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("another operation is in progress")]
    Busy,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_display() {
        assert_eq!(GameError::NothingToUndo.to_string(), "no moves to undo");
        let err = GameError::from(MoveError::ColumnFull(3));
        assert_eq!(err.to_string(), "invalid move: column 3 is full");
    }

    #[test]
    fn test_board_error_display() {
        let err = BoardError::TooSmall {
            rows: 3,
            cols: 7,
            min: 4,
        };
        assert_eq!(err.to_string(), "board must be at least 4x4, got 3x7");
    }

    #[test]
    fn test_store_timeout_display() {
        let err = StoreError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "store did not respond within 250ms");
    }

    #[test]
    fn test_sync_error_is_transparent() {
        let err = SyncError::from(PersistenceError::NotFound);
        assert_eq!(err.to_string(), "no saved game found");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("board.rows must be >= 4".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: board.rows must be >= 4"
        );
    }
}
