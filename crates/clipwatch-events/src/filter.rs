//! Filtering for journal snapshots.

use clipwatch_models::{LogEntry, LogTag, StreamIdentity};

/// Criteria for selecting journal entries.
///
/// A stream filter keeps entries for that stream plus entries that belong to
/// no stream (capture connection messages and the like). Entries for other
/// streams are dropped.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub stream: Option<StreamIdentity>,
    pub tag: Option<LogTag>,
}

impl LogFilter {
    /// Creates a filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stream(mut self, stream: impl Into<StreamIdentity>) -> Self {
        self.stream = Some(stream.into());
        self
    }

    pub fn with_tag(mut self, tag: LogTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Returns true if `entry` passes this filter.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(ref stream) = self.stream {
            if entry.stream.as_ref().is_some_and(|s| s != stream) {
                return false;
            }
        }

        if let Some(tag) = self.tag {
            if entry.tag != tag {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = LogFilter::new();
        assert!(filter.matches(&LogEntry::info("x")));
        assert!(filter.matches(&LogEntry::error("y").for_stream("streamB")));
    }

    #[test]
    fn test_stream_filter() {
        let filter = LogFilter::new().with_stream("streamA");

        assert!(filter.matches(&LogEntry::info("a").for_stream("streamA")));
        assert!(filter.matches(&LogEntry::info("global")));
        assert!(!filter.matches(&LogEntry::info("b").for_stream("streamB")));
    }

    #[test]
    fn test_tag_filter() {
        let filter = LogFilter::new().with_tag(LogTag::Trigger);
        assert!(filter.matches(&LogEntry::trigger("hit")));
        assert!(!filter.matches(&LogEntry::info("miss")));
    }
}
