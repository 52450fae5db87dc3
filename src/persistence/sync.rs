use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::config::PersistenceConfig;
use crate::error::{PersistenceError, StoreError};
use crate::game::GameState;

use super::snapshot;
use super::store::{LocalStore, RemoteStore};

/// Where a save landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored remotely (and mirrored locally on a best-effort basis).
    Remote,
    /// Remote failed; stored in the local store only.
    LocalOnly,
}

/// Which tier a loaded game came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub source: LoadSource,
    pub state: GameState,
}

/// Saves and loads game snapshots, remote first with a local fallback.
///
/// Each call makes at most one attempt per store, always in the order
/// remote, then local.
pub struct PersistenceSynchronizer<R, L> {
    remote: R,
    local: L,
    key: String,
    remote_timeout: Duration,
}

impl<R: RemoteStore, L: LocalStore> PersistenceSynchronizer<R, L> {
    pub fn new(remote: R, local: L, key: impl Into<String>, remote_timeout: Duration) -> Self {
        PersistenceSynchronizer {
            remote,
            local,
            key: key.into(),
            remote_timeout,
        }
    }

    pub fn from_config(remote: R, local: L, config: &PersistenceConfig) -> Self {
        Self::new(remote, local, config.session_key.clone(), config.remote_timeout())
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Save `state`. Falls back to the local store when the remote fails; only
    /// an error from that fallback write fails the save.
    #[instrument(skip(self, state), fields(key = %self.key, moves = state.history().len()))]
    pub async fn save(&self, state: &GameState) -> Result<SaveOutcome, PersistenceError> {
        let payload = snapshot::encode(state)?;

        match self.with_deadline(self.remote.put(&self.key, &payload)).await {
            Ok(()) => {
                if let Err(err) = self.local.put(&self.key, &payload) {
                    warn!(%err, "saved remotely but could not mirror to local store");
                }
                info!("game saved remotely");
                Ok(SaveOutcome::Remote)
            }
            Err(err) => {
                warn!(%err, "remote save failed, falling back to local store");
                self.local
                    .put(&self.key, &payload)
                    .map_err(PersistenceError::Local)?;
                info!("game saved locally only");
                Ok(SaveOutcome::LocalOnly)
            }
        }
    }

    /// Load the saved game for a `rows` x `cols` board: remote first, then
    /// local. Snapshots that fail validation count as absent.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self, rows: usize, cols: usize) -> Result<Loaded, PersistenceError> {
        let remote = match self.with_deadline(self.remote.get(&self.key)).await {
            Ok(found) => found,
            Err(err) => {
                warn!(%err, "remote load failed, trying local store");
                None
            }
        };
        if let Some(state) = remote.and_then(|text| self.decode(&text, rows, cols, "remote")) {
            info!("game loaded from remote");
            return Ok(Loaded {
                source: LoadSource::Remote,
                state,
            });
        }

        let local = match self.local.get(&self.key) {
            Ok(found) => found,
            Err(err) => {
                warn!(%err, "local store read failed");
                None
            }
        };
        if let Some(state) = local.and_then(|text| self.decode(&text, rows, cols, "local")) {
            info!("game loaded from local store");
            return Ok(Loaded {
                source: LoadSource::Local,
                state,
            });
        }

        info!("no saved game found");
        Err(PersistenceError::NotFound)
    }

    fn decode(&self, text: &str, rows: usize, cols: usize, tier: &str) -> Option<GameState> {
        match snapshot::decode(text, rows, cols) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(%err, tier, "ignoring unusable snapshot");
                None
            }
        }
    }

    async fn with_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.remote_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                debug!(timeout = ?self.remote_timeout, "remote call timed out");
                Err(StoreError::Timeout(self.remote_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player;
    use crate::persistence::{MemoryLocal, MemoryRemote};

    const KEY: &str = "c4";

    fn synchronizer() -> PersistenceSynchronizer<MemoryRemote, MemoryLocal> {
        PersistenceSynchronizer::new(
            MemoryRemote::new(),
            MemoryLocal::new(),
            KEY,
            Duration::from_secs(5),
        )
    }

    fn played(columns: &[usize]) -> GameState {
        columns
            .iter()
            .fold(GameState::initial(), |state, &col| state.apply_move(col).unwrap())
    }

    #[tokio::test]
    async fn test_save_remote_mirrors_local() {
        let sync = synchronizer();
        let state = played(&[3, 4, 3]);

        assert_eq!(sync.save(&state).await.unwrap(), SaveOutcome::Remote);
        assert!(sync.remote().raw(KEY).is_some());
        assert_eq!(sync.remote().raw(KEY), sync.local().raw(KEY));
    }

    #[tokio::test]
    async fn test_save_remote_offline_degrades_to_local() {
        let sync = synchronizer();
        sync.remote().set_offline(true);
        let state = played(&[2]);

        assert_eq!(sync.save(&state).await.unwrap(), SaveOutcome::LocalOnly);
        assert!(sync.remote().raw(KEY).is_none());
        assert!(sync.local().raw(KEY).is_some());
    }

    #[tokio::test]
    async fn test_mirror_failure_does_not_fail_save() {
        let sync = synchronizer();
        sync.local().set_fail_writes(true);

        assert_eq!(
            sync.save(&played(&[1])).await.unwrap(),
            SaveOutcome::Remote
        );
    }

    #[tokio::test]
    async fn test_save_fails_when_both_tiers_fail() {
        let sync = synchronizer();
        sync.remote().set_offline(true);
        sync.local().set_fail_writes(true);

        assert!(matches!(
            sync.save(&played(&[1])).await,
            Err(PersistenceError::Local(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_remote_times_out_then_saves_locally() {
        let sync = synchronizer();
        sync.remote().set_stalled(true);

        assert_eq!(
            sync.save(&played(&[0])).await.unwrap(),
            SaveOutcome::LocalOnly
        );
    }

    #[tokio::test]
    async fn test_roundtrip_through_remote() {
        let sync = synchronizer();
        let state = played(&[0, 0, 1, 1, 2, 2, 3]);
        sync.save(&state).await.unwrap();

        let loaded = sync.load(6, 7).await.unwrap();
        assert_eq!(loaded.source, LoadSource::Remote);
        assert_eq!(loaded.state, state);
        assert_eq!(loaded.state.winner(), Some(Player::Red));
    }

    #[tokio::test]
    async fn test_load_prefers_remote_over_local() {
        let sync = synchronizer();
        sync.local()
            .insert_raw(KEY, &snapshot::encode(&played(&[1])).unwrap());
        sync.remote()
            .insert_raw(KEY, &snapshot::encode(&played(&[5])).unwrap());

        let loaded = sync.load(6, 7).await.unwrap();
        assert_eq!(loaded.source, LoadSource::Remote);
        assert_eq!(loaded.state, played(&[5]));
    }

    #[tokio::test]
    async fn test_load_falls_back_when_remote_offline() {
        let sync = synchronizer();
        let state = played(&[4, 4]);
        sync.save(&state).await.unwrap();
        sync.remote().set_offline(true);

        let loaded = sync.load(6, 7).await.unwrap();
        assert_eq!(loaded.source, LoadSource::Local);
        assert_eq!(loaded.state, state);
    }

    #[tokio::test]
    async fn test_load_falls_back_when_remote_empty() {
        let sync = synchronizer();
        sync.local()
            .insert_raw(KEY, &snapshot::encode(&played(&[6])).unwrap());

        let loaded = sync.load(6, 7).await.unwrap();
        assert_eq!(loaded.source, LoadSource::Local);
    }

    #[tokio::test]
    async fn test_corrupt_remote_treated_as_empty() {
        let sync = synchronizer();
        sync.remote().insert_raw(KEY, "{\"c4\": {\"board\": []}}");
        sync.local()
            .insert_raw(KEY, &snapshot::encode(&played(&[2])).unwrap());

        let loaded = sync.load(6, 7).await.unwrap();
        assert_eq!(loaded.source, LoadSource::Local);
        assert_eq!(loaded.state, played(&[2]));
    }

    #[tokio::test]
    async fn test_load_not_found() {
        let sync = synchronizer();
        sync.local().insert_raw(KEY, "not json");
        assert!(matches!(
            sync.load(6, 7).await,
            Err(PersistenceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_other_dimensions() {
        let sync = synchronizer();
        sync.save(&GameState::new(5, 5).unwrap()).await.unwrap();
        assert!(matches!(
            sync.load(6, 7).await,
            Err(PersistenceError::NotFound)
        ));
    }
}
