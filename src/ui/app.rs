use std::io;
use std::sync::mpsc;
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{backend::Backend, Terminal};
use tokio::runtime::Handle;
use tokio::sync::broadcast;

use crate::controller::{GameController, GameEvent};
use crate::error::{GameError, PersistenceError, SyncError};
use crate::game::GameStatus;
use crate::persistence::{LoadSource, LocalStore, RemoteStore, SaveOutcome};

/// Result of a save or load running on the runtime.
enum TaskResult {
    Saved(Result<SaveOutcome, SyncError>),
    Loaded(Result<LoadSource, SyncError>),
}

pub struct App<R, L> {
    controller: Arc<GameController<R, L>>,
    runtime: Handle,
    events: broadcast::Receiver<GameEvent>,
    task_tx: mpsc::Sender<TaskResult>,
    task_rx: mpsc::Receiver<TaskResult>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    pending: Option<&'static str>,
    celebrating: bool,
}

impl<R, L> App<R, L>
where
    R: RemoteStore + 'static,
    L: LocalStore + 'static,
{
    pub fn new(controller: Arc<GameController<R, L>>, runtime: Handle) -> Self {
        let (task_tx, task_rx) = mpsc::channel();
        let events = controller.subscribe_events();
        let selected_column = controller.view().board.cols() / 2;
        App {
            controller,
            runtime,
            events,
            task_tx,
            task_rx,
            selected_column,
            should_quit: false,
            message: None,
            pending: None,
            celebrating: false,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.drain_tasks();
            self.drain_game_events();
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                let last = self.controller.view().board.cols() - 1;
                if self.selected_column < last {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('u') => match self.controller.undo() {
                Ok(column) => self.selected_column = column,
                Err(err) => self.reject(err),
            },
            KeyCode::Char('r') => match self.controller.reset() {
                Ok(()) => {
                    self.selected_column = self.controller.view().board.cols() / 2;
                    self.message = Some("Game reset".to_string());
                }
                Err(err) => self.reject(err),
            },
            KeyCode::Char('s') => self.spawn_save(),
            KeyCode::Char('l') => self.spawn_load(),
            _ => {}
        }
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        match self.controller.apply_move(self.selected_column) {
            Ok(GameStatus::InProgress(_)) => {
                if self.controller.view().is_draw {
                    self.message = Some("It's a draw! Press 'r' to restart.".to_string());
                }
            }
            // the win banner comes from the event stream
            Ok(GameStatus::Won(_)) => {}
            Err(GameError::GameAlreadyWon) => {
                self.message = Some("Game over! Press 'r' to restart.".to_string());
            }
            Err(err) => self.reject(err),
        }
    }

    fn reject(&mut self, err: GameError) {
        self.message = Some(match err {
            GameError::NothingToUndo | GameError::GameAlreadyWon => {
                format!("I'm sorry, I can't do that: {err}")
            }
            GameError::Busy => "Busy, try again in a moment".to_string(),
            GameError::InvalidMove(_) => format!("Can't play there: {err}"),
        });
    }

    fn spawn_save(&mut self) {
        if self.controller.is_busy() {
            self.reject(GameError::Busy);
            return;
        }
        self.pending = Some("Saving...");
        let controller = Arc::clone(&self.controller);
        let tx = self.task_tx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(TaskResult::Saved(controller.save().await));
        });
    }

    fn spawn_load(&mut self) {
        if self.controller.is_busy() {
            self.reject(GameError::Busy);
            return;
        }
        self.pending = Some("Loading...");
        let controller = Arc::clone(&self.controller);
        let tx = self.task_tx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(TaskResult::Loaded(controller.load().await));
        });
    }

    fn drain_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.pending = None;
            self.message = Some(match result {
                TaskResult::Saved(Ok(SaveOutcome::Remote)) => {
                    "Game saved on server & offline".to_string()
                }
                TaskResult::Saved(Ok(SaveOutcome::LocalOnly)) => {
                    "Server is not available, saved offline".to_string()
                }
                TaskResult::Saved(Err(err)) => format!("Save failed: {err}"),
                TaskResult::Loaded(Ok(LoadSource::Remote)) => {
                    "Game loaded from server".to_string()
                }
                TaskResult::Loaded(Ok(LoadSource::Local)) => {
                    "Server unavailable, game loaded from local".to_string()
                }
                TaskResult::Loaded(Err(SyncError::Persistence(PersistenceError::NotFound))) => {
                    "No saved game was found".to_string()
                }
                TaskResult::Loaded(Err(err)) => format!("Load failed: {err}"),
            });
        }
    }

    fn drain_game_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(GameEvent::Won { .. }) => self.celebrating = true,
                Ok(GameEvent::Cleared) => self.celebrating = false,
                Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    self.celebrating = self.controller.view().winner.is_some();
                }
                Err(_) => break,
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let view = self.controller.view();
        let message = self.pending.map(str::to_string).or_else(|| self.message.clone());
        super::game_view::render(
            frame,
            &view,
            self.selected_column,
            &message,
            self.celebrating,
        );
    }
}
