//! Game persistence: the snapshot format, store contracts and
//! implementations, and the remote-then-local synchronizer.

mod dir;
mod memory;
pub mod snapshot;
mod store;
mod sync;

pub use dir::{DirLocal, DirRemote};
pub use memory::{MemoryLocal, MemoryRemote};
pub use store::{LocalStore, RemoteStore};
pub use sync::{LoadSource, Loaded, PersistenceSynchronizer, SaveOutcome};
