// Library surface for the binary, headless/integration tests and reuse.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod game;
pub mod progress;
pub mod results;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod util;

pub use error::{GameError, StorageError};
pub use progress::ProgressStore;
pub use session::Game;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
