use crate::error::{BoardError, MoveError};

use super::Player;

pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 7;

/// Smallest dimension on which four in a row can exist.
pub const MIN_DIMENSION: usize = 4;
pub const MAX_DIMENSION: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Occupied(Player),
}

impl Cell {
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Option<Player>> for Cell {
    fn from(value: Option<Player>) -> Self {
        value.map_or(Cell::Empty, Cell::Occupied)
    }
}

/// Row-major grid. Row 0 is the top, row `rows - 1` is the bottom where
/// pieces land first.
///
/// Boards are values: `drop_piece` and `remove_top_piece` return a new board
/// and leave the receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows < MIN_DIMENSION || cols < MIN_DIMENSION {
            return Err(BoardError::TooSmall {
                rows,
                cols,
                min: MIN_DIMENSION,
            });
        }
        if rows > MAX_DIMENSION || cols > MAX_DIMENSION {
            return Err(BoardError::TooLarge {
                rows,
                cols,
                max: MAX_DIMENSION,
            });
        }
        Ok(Self::empty(rows, cols))
    }

    /// The classic 6x7 board
    pub fn standard() -> Self {
        Self::empty(DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// An empty board with the same dimensions
    pub fn cleared(&self) -> Self {
        Self::empty(self.rows, self.cols)
    }

    fn empty(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Build a board from row-major cells, top row first. Rejects ragged rows
    /// and pieces that float above an empty cell.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut board = Board::new(height, width)?;

        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(BoardError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            let start = row * width;
            board.cells[start..start + width].copy_from_slice(&cells);
        }

        for col in 0..width {
            for row in 0..height - 1 {
                if !board.get(row, col).is_empty() && board.get(row + 1, col).is_empty() {
                    return Err(BoardError::Floating { row, col });
                }
            }
        }

        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at a specific position. Panics when out of range.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.rows && col < self.cols, "cell ({row}, {col}) out of range");
        self.cells[row * self.cols + col]
    }

    /// Iterate over rows from top to bottom
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols)
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.cols {
            return true;
        }
        !self.get(0, col).is_empty()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// Number of pieces stacked in a column
    pub fn column_height(&self, col: usize) -> usize {
        if col >= self.cols {
            return 0;
        }
        (0..self.rows)
            .filter(|&row| !self.get(row, col).is_empty())
            .count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Row of the topmost piece in a column, if any.
    pub fn top_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows).find(|&row| !self.get(row, col).is_empty())
    }

    /// Drop a piece in a column. Returns the new board and the row where the
    /// piece landed.
    pub fn drop_piece(&self, col: usize, player: Player) -> Result<(Board, usize), MoveError> {
        if col >= self.cols {
            return Err(MoveError::InvalidColumn(col));
        }

        // Lowest empty row in this column
        let row = (0..self.rows)
            .rev()
            .find(|&row| self.get(row, col).is_empty())
            .ok_or(MoveError::ColumnFull(col))?;

        let mut next = self.clone();
        next.cells[row * self.cols + col] = player.to_cell();
        Ok((next, row))
    }

    /// Remove the most recently dropped piece of a column. `None` when the
    /// column is empty or out of range.
    pub fn remove_top_piece(&self, col: usize) -> Option<Board> {
        let row = self.top_row(col)?;
        let mut next = self.clone();
        next.cells[row * self.cols + col] = Cell::Empty;
        Some(next)
    }

    #[cfg(test)]
    pub(crate) fn unchecked(rows: usize, cols: usize) -> Self {
        Self::empty(rows, cols)
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
