//! Fixed-capacity operator log.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use clipwatch_models::{LogEntry, LogTag};
use tracing::{info, warn};

use crate::filter::LogFilter;

/// Number of entries kept before the oldest are evicted.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Ring buffer of operator log entries.
///
/// Appends evict the oldest entry once `capacity` is reached. Every append is
/// also emitted as a `tracing` event so process logs carry the same lines.
#[derive(Debug, Clone)]
pub struct LogJournal {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl Default for LogJournal {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl LogJournal {
    /// Creates a journal holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    // A panic on another thread must not take the journal down with it.
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends an entry, evicting the oldest one when full.
    pub fn append(&self, entry: LogEntry) {
        let stream = entry.stream.as_ref().map(|s| s.as_str()).unwrap_or("-");
        match entry.tag {
            LogTag::Error => warn!(stream, tag = %entry.tag, "{}", entry.message),
            _ => info!(stream, tag = %entry.tag, "{}", entry.message),
        }

        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Copies matching entries, oldest first, without changing the journal.
    pub fn snapshot(&self, filter: &LogFilter) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
