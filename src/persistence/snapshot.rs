//! JSON wire format for saved games.
//!
//! ```json
//! {"c4": {"board": [[null, "red", ...], ...],
//!         "currentPlayer": "blue",
//!         "winner": null,
//!         "moveHistory": [1]}}
//! ```
//!
//! Rows are listed top first. Empty strings are accepted wherever a player tag
//! may be absent.

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::game::{Board, Cell, GameState, MoveHistory, Player};

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    c4: Snapshot,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    board: Vec<Vec<Option<String>>>,
    current_player: String,
    #[serde(default)]
    winner: Option<String>,
    #[serde(default)]
    move_history: Vec<usize>,
}

/// Serialize a game state.
pub fn encode(state: &GameState) -> Result<String, serde_json::Error> {
    let board = state
        .board()
        .rows_iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.player().map(|p| p.tag().to_string()))
                .collect()
        })
        .collect();

    let envelope = Envelope {
        c4: Snapshot {
            board,
            current_player: state.current_player().tag().to_string(),
            winner: state.winner().map(|p| p.tag().to_string()),
            move_history: state.history().as_slice().to_vec(),
        },
    };
    serde_json::to_string(&envelope)
}

/// Parse and validate a saved game. The board must be `rows` x `cols`.
pub fn decode(text: &str, rows: usize, cols: usize) -> Result<GameState, SnapshotError> {
    let Envelope { c4: snapshot } = serde_json::from_str(text)?;

    if snapshot.board.len() != rows || snapshot.board.iter().any(|row| row.len() != cols) {
        return Err(SnapshotError::Corrupt(format!(
            "expected a {rows}x{cols} board, got {}x{}",
            snapshot.board.len(),
            snapshot.board.first().map_or(0, Vec::len)
        )));
    }

    let cells = snapshot
        .board
        .iter()
        .map(|row| {
            row.iter()
                .map(|tag| parse_optional(tag.as_deref()).map(Cell::from))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let board = Board::from_rows(cells)?;
    let current_player = parse_optional(Some(snapshot.current_player.as_str()))?
        .ok_or_else(|| SnapshotError::Corrupt("missing current player".into()))?;
    let winner = parse_optional(snapshot.winner.as_deref())?;

    GameState::from_parts(
        board,
        current_player,
        winner,
        MoveHistory::from_vec(snapshot.move_history),
    )
}

fn parse_optional(tag: Option<&str>) -> Result<Option<Player>, SnapshotError> {
    match tag {
        None | Some("") => Ok(None),
        Some(tag) => tag.parse().map(Some).map_err(SnapshotError::Corrupt),
    }
}
