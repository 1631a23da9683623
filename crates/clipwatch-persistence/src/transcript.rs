//! Per-session chat and trigger transcripts.
//!
//! Each monitoring start opens a pair of append-only text files:
//! `chat_{identity}_{YYYY-MM-DD_HH-MM-SS}.txt` with every message and
//! `triggers_{identity}_{...}.txt` with the matched ones.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clipwatch_core::{line_stamp, sanitize_component, session_stamp};
use clipwatch_models::{ChatEvent, StreamIdentity};

use crate::atomic::ensure_dir;
use crate::error::{PersistenceError, Result};

/// Transcript file pair for one monitoring session.
#[derive(Debug, Clone)]
pub struct Transcript {
    chat_path: PathBuf,
    trigger_path: PathBuf,
}

impl Transcript {
    /// Picks the file names for a session started at `started_at` and makes
    /// sure `dir` exists. Files are created on first append.
    pub fn open(dir: &Path, identity: &StreamIdentity, started_at: DateTime<Utc>) -> Result<Self> {
        ensure_dir(dir)?;
        let stamp = session_stamp(started_at);
        let name = sanitize_component(identity.as_str());
        Ok(Self {
            chat_path: dir.join(format!("chat_{name}_{stamp}.txt")),
            trigger_path: dir.join(format!("triggers_{name}_{stamp}.txt")),
        })
    }

    pub fn chat_path(&self) -> &Path {
        &self.chat_path
    }

    pub fn trigger_path(&self) -> &Path {
        &self.trigger_path
    }

    /// Appends `event` to the chat transcript.
    pub fn record_chat(&self, event: &ChatEvent) -> Result<()> {
        append_line(&self.chat_path, &format_line(event))
    }

    /// Appends `event` to the trigger transcript.
    pub fn record_trigger(&self, event: &ChatEvent) -> Result<()> {
        append_line(&self.trigger_path, &format_line(event))
    }
}

/// `[2024-01-01 10:00:00 AM] alice: text`
pub fn format_line(event: &ChatEvent) -> String {
    format!(
        "[{}] {}: {}\n",
        line_stamp(event.received_at),
        event.chatter_label(),
        event.text
    )
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let write_err = |source| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(line.as_bytes()).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn started() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap()
    }

    #[test]
    fn test_file_names() {
        let dir = tempdir().unwrap();
        let transcript =
            Transcript::open(dir.path(), &StreamIdentity::new("alice"), started()).unwrap();

        assert!(transcript
            .chat_path()
            .ends_with("chat_alice_2024-01-01_10-00-00.txt"));
        assert!(transcript
            .trigger_path()
            .ends_with("triggers_alice_2024-01-01_10-00-00.txt"));
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("transcripts");
        Transcript::open(&nested, &StreamIdentity::new("bob"), started()).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_record_appends_lines() {
        let dir = tempdir().unwrap();
        let transcript =
            Transcript::open(dir.path(), &StreamIdentity::new("alice"), started()).unwrap();
        let first = ChatEvent::new("alice", "u1", "hello").with_received_at(started());
        let second = ChatEvent::new("alice", "u2", "lock it")
            .with_display_name("Bob")
            .with_received_at(started());

        transcript.record_chat(&first).unwrap();
        transcript.record_chat(&second).unwrap();
        transcript.record_trigger(&second).unwrap();

        let chat = fs::read_to_string(transcript.chat_path()).unwrap();
        assert_eq!(
            chat,
            "[2024-01-01 10:00:00 AM] u1: hello\n[2024-01-01 10:00:00 AM] Bob: lock it\n"
        );
        let triggers = fs::read_to_string(transcript.trigger_path()).unwrap();
        assert_eq!(triggers, "[2024-01-01 10:00:00 AM] Bob: lock it\n");
    }

    #[test]
    fn test_identity_is_sanitized_in_name() {
        let dir = tempdir().unwrap();
        let transcript =
            Transcript::open(dir.path(), &StreamIdentity::new("a/b"), started()).unwrap();
        assert!(transcript
            .chat_path()
            .ends_with("chat_a_b_2024-01-01_10-00-00.txt"));
    }
}
