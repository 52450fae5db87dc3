/// Ordered record of the columns played, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MoveHistory {
    moves: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no moves to undo")]
pub struct EmptyHistory;

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(moves: Vec<usize>) -> Self {
        MoveHistory { moves }
    }

    /// Append a move
    pub fn record(&mut self, column: usize) {
        self.moves.push(column);
    }

    /// Pop the most recent move
    pub fn undo(&mut self) -> Result<usize, EmptyHistory> {
        self.moves.pop().ok_or(EmptyHistory)
    }

    pub fn last(&self) -> Option<usize> {
        self.moves.last().copied()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.moves
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_then_undo_is_lifo() {
        let mut history = MoveHistory::new();
        history.record(3);
        history.record(4);
        assert_eq!(history.as_slice(), &[3, 4]);

        assert_eq!(history.undo(), Ok(4));
        assert_eq!(history.last(), Some(3));
        assert_eq!(history.undo(), Ok(3));
        assert!(history.is_empty());
    }

    #[test]
    fn test_undo_on_empty_fails() {
        let mut history = MoveHistory::new();
        assert_eq!(history.undo(), Err(EmptyHistory));
        assert_eq!(EmptyHistory.to_string(), "no moves to undo");
    }

    #[test]
    fn test_clear() {
        let mut history = MoveHistory::from_vec(vec![0, 1, 2]);
        assert_eq!(history.len(), 3);
        history.clear();
        assert!(history.is_empty());
    }
}
