//! Clipwatch Core - trigger logic shared by the runtime and the API.
//!
//! - **matcher**: first-keyword-wins matching of chat text
//! - **namer**: sanitized clip file names
//! - **clock**: fixed UTC+8 civil time used for names and transcripts
//! - **config**: state, config, transcript and video directory resolution
//! - **settings**: the persisted operator configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod matcher;
pub mod namer;
pub mod settings;

pub use clock::{clip_stamp, line_stamp, session_stamp, to_civil, CIVIL_OFFSET_HOURS};
pub use config::{
    config_file, ensure_state_dir, resolve_video_dir, state_dir, transcripts_dir, video_dir,
    Platform,
};
pub use error::{CoreError, Result};
pub use matcher::match_keyword;
pub use namer::{artifact_name, sanitize_component, MAX_COMPONENT_LEN};
pub use settings::{Settings, Usernames, DEFAULT_KEYWORDS};
