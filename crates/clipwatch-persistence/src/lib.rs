//! Persistence layer for Clipwatch.
//!
//! Everything Clipwatch keeps on disk goes through this crate:
//!
//! - the operator configuration file, written atomically
//! - per-session chat and trigger transcripts (append-only text)
//! - the listing of saved replay clips
//!
//! # Example
//!
//! ```no_run
//! use clipwatch_core::Settings;
//! use clipwatch_persistence::SettingsStore;
//!
//! let store = SettingsStore::new("/home/user/.clipwatch/config.json");
//! store.save(&Settings::default().with_usernames("alice")).unwrap();
//! let settings = store.load();
//! ```

pub mod atomic;
pub mod error;
pub mod replays;
pub mod settings_store;
pub mod transcript;

pub use error::{PersistenceError, Result};
pub use replays::{list_replays, ReplayFile, REPLAY_EXTENSIONS};
pub use settings_store::SettingsStore;
pub use transcript::Transcript;
