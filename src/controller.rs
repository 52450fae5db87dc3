//! Session controller: the single owner of the live game.
//!
//! Every mutating operation (`apply_move`, `undo`, `reset`, `save`, `load`)
//! must hold the mutation gate. The gate is taken with `try_lock`, so a
//! request that arrives while another one is in flight fails with `Busy`
//! instead of queueing. `save` and `load` keep the gate across their awaits.
//!
//! Reads go through a `watch` channel that is updated while the gate is
//! held, so they never wait and always see a committed state.

use tokio::sync::{broadcast, watch, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::{BoardError, GameError, SyncError};
use crate::game::{Board, GameState, GameStatus, Player};
use crate::persistence::{LoadSource, LocalStore, PersistenceSynchronizer, RemoteStore, SaveOutcome};

const EVENT_CAPACITY: usize = 16;

/// Read-only projection handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub board: Board,
    pub current_player: Player,
    pub winner: Option<Player>,
    pub move_count: usize,
    pub is_draw: bool,
}

impl From<&GameState> for GameView {
    fn from(state: &GameState) -> Self {
        GameView {
            board: state.board().clone(),
            current_player: state.current_player(),
            winner: state.winner(),
            move_count: state.history().len(),
            is_draw: state.is_draw(),
        }
    }
}

/// Pushed to subscribers when the winner changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A winner was set, by a move or by adopting a loaded game.
    Won { winner: Player },
    /// A previously set winner was cleared by reset or load.
    Cleared,
}

pub struct GameController<R, L> {
    gate: Mutex<GameState>,
    published: watch::Sender<GameState>,
    events: broadcast::Sender<GameEvent>,
    sync: PersistenceSynchronizer<R, L>,
}

impl<R: RemoteStore, L: LocalStore> GameController<R, L> {
    pub fn new(state: GameState, sync: PersistenceSynchronizer<R, L>) -> Self {
        let (published, _) = watch::channel(state.clone());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        GameController {
            gate: Mutex::new(state),
            published,
            events,
            sync,
        }
    }

    /// Start an empty game on a `rows` x `cols` board.
    pub fn with_board(
        rows: usize,
        cols: usize,
        sync: PersistenceSynchronizer<R, L>,
    ) -> Result<Self, BoardError> {
        Ok(Self::new(GameState::new(rows, cols)?, sync))
    }

    /// Current projection for rendering. Never blocks.
    pub fn view(&self) -> GameView {
        GameView::from(&*self.published.borrow())
    }

    /// Copy of the full committed state. Never blocks.
    pub fn state(&self) -> GameState {
        self.published.borrow().clone()
    }

    pub fn status(&self) -> GameStatus {
        self.published.borrow().status()
    }

    /// Receiver that is notified after every committed change.
    pub fn subscribe_view(&self) -> watch::Receiver<GameState> {
        self.published.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// True while a mutating operation holds the gate.
    pub fn is_busy(&self) -> bool {
        self.gate.try_lock().is_err()
    }

    pub fn synchronizer(&self) -> &PersistenceSynchronizer<R, L> {
        &self.sync
    }

    /// Drop a piece for the current player. Returns the resulting status.
    pub fn apply_move(&self, column: usize) -> Result<GameStatus, GameError> {
        let mut guard = self.enter()?;
        let next = guard.apply_move(column)?;
        debug!(column, player = %guard.current_player(), "move applied");
        let status = next.status();
        self.commit(&mut guard, next);
        Ok(status)
    }

    /// Take back the last move. Returns the column it was played in.
    pub fn undo(&self) -> Result<usize, GameError> {
        let mut guard = self.enter()?;
        let (next, column) = guard.undo()?;
        debug!(column, "move undone");
        self.commit(&mut guard, next);
        Ok(column)
    }

    /// Clear the board and give the first turn to Red.
    pub fn reset(&self) -> Result<(), GameError> {
        let mut guard = self.enter()?;
        let next = guard.reset();
        info!("game reset");
        self.commit(&mut guard, next);
        Ok(())
    }

    /// Persist the current game. The gate stays held until both tiers have
    /// answered.
    pub async fn save(&self) -> Result<SaveOutcome, SyncError> {
        let guard = self.enter().map_err(|_| SyncError::Busy)?;
        let outcome = self.sync.save(&guard).await?;
        drop(guard);
        Ok(outcome)
    }

    /// Replace the current game with the saved one. On `NotFound` the
    /// current game is left untouched.
    pub async fn load(&self) -> Result<LoadSource, SyncError> {
        let mut guard = self.enter().map_err(|_| SyncError::Busy)?;
        let (rows, cols) = (guard.board().rows(), guard.board().cols());
        let loaded = self.sync.load(rows, cols).await?;
        self.commit(&mut guard, loaded.state);
        Ok(loaded.source)
    }

    fn enter(&self) -> Result<MutexGuard<'_, GameState>, GameError> {
        self.gate.try_lock().map_err(|_| {
            debug!("rejected: another operation is in progress");
            GameError::Busy
        })
    }

    /// Swap in the next state, publish it, and announce winner changes.
    fn commit(&self, guard: &mut MutexGuard<'_, GameState>, next: GameState) {
        let before = guard.winner();
        **guard = next;
        self.published.send_replace(guard.clone());

        match (before, guard.winner()) {
            (None, Some(winner)) => {
                info!(%winner, "game won");
                let _ = self.events.send(GameEvent::Won { winner });
            }
            (Some(_), None) => {
                let _ = self.events.send(GameEvent::Cleared);
            }
            _ => {}
        }
    }
}
