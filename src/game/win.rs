//! Whole-board four-in-a-row detection.
//!
//! A single sliding-window scan handles every direction: for each direction
//! vector and each start cell, the window of [`LINE_LENGTH`] cells either lies
//! entirely on the board and belongs to the player, or it does not.

use super::{Board, Player};

pub const LINE_LENGTH: usize = 4;

/// (row step, column step): vertical, horizontal, diagonal down-right,
/// diagonal down-left.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Returns `Some(player)` if `player` has four in a row anywhere on the board.
pub fn check_winner(board: &Board, player: Player) -> Option<Player> {
    winning_line(board, player).map(|_| player)
}

/// Cells of the first winning line found for `player`, as (row, col) pairs.
pub fn winning_line(board: &Board, player: Player) -> Option<[(usize, usize); LINE_LENGTH]> {
    if board.rows() < LINE_LENGTH || board.cols() < LINE_LENGTH {
        return None;
    }

    for &(dr, dc) in &DIRECTIONS {
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if let Some(line) = window(board, row, col, dr, dc) {
                    if line.iter().all(|&(r, c)| board.get(r, c) == player.to_cell()) {
                        return Some(line);
                    }
                }
            }
        }
    }

    None
}

/// Coordinates of the window starting at (row, col), or `None` if it would
/// leave the board.
fn window(
    board: &Board,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
) -> Option<[(usize, usize); LINE_LENGTH]> {
    let mut line = [(0, 0); LINE_LENGTH];
    for (step, slot) in line.iter_mut().enumerate() {
        let r = row.checked_add_signed(dr * step as isize)?;
        let c = col.checked_add_signed(dc * step as isize)?;
        if r >= board.rows() || c >= board.cols() {
            return None;
        }
        *slot = (r, c);
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    fn place(board: &mut Board, cells: &[(usize, usize)], player: Player) {
        for &(row, col) in cells {
            board.set(row, col, Cell::Occupied(player));
        }
    }

    #[test]
    fn test_vertical_win_by_repeated_drops() {
        let mut board = Board::standard();
        for _ in 0..4 {
            board = board.drop_piece(3, Player::Red).unwrap().0;
        }
        assert_eq!(check_winner(&board, Player::Red), Some(Player::Red));
        assert_eq!(check_winner(&board, Player::Blue), None);
    }

    #[test]
    fn test_horizontal_win_on_bottom_row() {
        let mut board = Board::standard();
        place(&mut board, &[(5, 0), (5, 1), (5, 2), (5, 3)], Player::Blue);
        assert_eq!(check_winner(&board, Player::Blue), Some(Player::Blue));
    }

    #[test]
    fn test_diagonal_up_right_win() {
        let mut board = Board::standard();
        place(&mut board, &[(5, 0), (4, 1), (3, 2), (2, 3)], Player::Red);
        assert_eq!(check_winner(&board, Player::Red), Some(Player::Red));
        assert_eq!(
            winning_line(&board, Player::Red),
            Some([(2, 3), (3, 2), (4, 1), (5, 0)])
        );
    }

    #[test]
    fn test_diagonal_down_right_win() {
        let mut board = Board::standard();
        place(&mut board, &[(2, 3), (3, 4), (4, 5), (5, 6)], Player::Blue);
        assert_eq!(check_winner(&board, Player::Blue), Some(Player::Blue));
    }

    #[test]
    fn test_diagonal_win_built_by_drops() {
        let mut board = Board::standard();
        let drops = [
            (0, Player::Red),
            (1, Player::Blue),
            (1, Player::Red),
            (2, Player::Blue),
            (2, Player::Blue),
            (2, Player::Red),
            (3, Player::Blue),
            (3, Player::Blue),
            (3, Player::Blue),
            (3, Player::Red),
        ];
        for (col, player) in drops {
            board = board.drop_piece(col, player).unwrap().0;
        }
        assert_eq!(check_winner(&board, Player::Red), Some(Player::Red));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::standard();
        place(&mut board, &[(5, 0), (5, 1), (5, 2)], Player::Red);
        assert_eq!(check_winner(&board, Player::Red), None);
    }

    #[test]
    fn test_line_does_not_wrap_rows() {
        let mut board = Board::standard();
        place(&mut board, &[(4, 5), (4, 6), (3, 0), (3, 1)], Player::Red);
        assert_eq!(check_winner(&board, Player::Red), None);
    }

    #[test]
    fn test_interrupted_line_is_not_a_win() {
        let mut board = Board::standard();
        place(&mut board, &[(5, 0), (5, 1), (5, 3), (5, 4)], Player::Red);
        place(&mut board, &[(5, 2)], Player::Blue);
        assert_eq!(check_winner(&board, Player::Red), None);
    }

    #[test]
    fn test_small_board_never_wins() {
        let mut board = Board::unchecked(3, 8);
        place(&mut board, &[(0, 0), (0, 1), (0, 2), (0, 3)], Player::Red);
        assert_eq!(check_winner(&board, Player::Red), None);
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut board = Board::standard();
        place(&mut board, &[(5, 1), (4, 1), (3, 1), (2, 1)], Player::Blue);
        let first = check_winner(&board, Player::Blue);
        let second = check_winner(&board, Player::Blue);
        assert_eq!(first, second);
        assert_eq!(first, Some(Player::Blue));
    }
}
