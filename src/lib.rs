pub mod app;
pub mod config;
pub mod counter;
pub mod dates;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod kv;
pub mod models;
pub mod rollover;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use counter::CounterState;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use rollover::spawn_rollover_watcher;
pub use state::AppState;
pub use storage::{load_state, save_state};
