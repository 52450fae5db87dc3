use crate::controller::GameView;
use crate::game::{win, Board, Cell, Player};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    view: &GameView,
    selected_column: usize,
    message: &Option<String>,
    celebrating: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(view.board.rows() as u16 + 4), // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_board(frame, view, selected_column, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);

    if celebrating {
        if let Some(winner) = view.winner {
            render_win_banner(frame, winner, chunks[1]);
        }
    }
}

fn player_color(player: Player) -> Color {
    match player {
        Player::Red => Color::Red,
        Player::Blue => Color::Blue,
    }
}

fn render_header(frame: &mut Frame, view: &GameView, area: ratatui::layout::Rect) {
    let (status, color) = match view.winner {
        Some(winner) => (format!("{} wins!", winner.name()), player_color(winner)),
        None if view.is_draw => ("Draw".to_string(), Color::Gray),
        None => (
            format!("It's {}'s turn  |  Move {}", view.current_player.name(), view.move_count + 1),
            player_color(view.current_player),
        ),
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    view: &GameView,
    selected_column: usize,
    area: ratatui::layout::Rect,
) {
    let board: &Board = &view.board;
    let line = view
        .winner
        .and_then(|winner| win::winning_line(board, winner));
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..board.cols() {
        let label = format!("{:^3}", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(col_line));

    let rule = "═".repeat(board.cols() * 3 + 1);
    lines.push(Line::from(format!("  ╔{rule}╗")));

    for (row, cells) in board.rows_iter().enumerate() {
        let mut row_spans = vec![Span::raw("  ║")];

        for (col, cell) in cells.iter().enumerate() {
            let (symbol, mut style) = match cell {
                Cell::Empty => (" . ", Style::default().fg(Color::DarkGray)),
                Cell::Occupied(player) => (" ● ", Style::default().fg(player_color(*player))),
            };
            if line.is_some_and(|line| line.contains(&(row, col))) {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            row_spans.push(Span::styled(symbol, style));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{rule}╝")));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..board.cols() {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_win_banner(frame: &mut Frame, winner: Player, area: ratatui::layout::Rect) {
    let width = 30.min(area.width);
    let height = 5.min(area.height);
    let banner_area = ratatui::layout::Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} wins!", winner.name()),
            Style::default()
                .fg(player_color(winner))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Press 'r' to start a new game"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Game over"));

    frame.render_widget(Clear, banner_area);
    frame.render_widget(banner, banner_area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: ratatui::layout::Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let controls = Paragraph::new(Line::from(
        "←/→: Move  |  Enter: Drop  |  U: Undo  |  R: Reset  |  S: Save  |  L: Load  |  Q: Quit",
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Controls"),
    );

    frame.render_widget(controls, area);
}
