//! Civil time used for clip names and transcripts.
//!
//! All operator-visible timestamps are rendered in a fixed UTC+8 offset
//! regardless of the host timezone.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Offset of the civil clock from UTC, in hours.
pub const CIVIL_OFFSET_HOURS: i32 = 8;

/// Returns the fixed civil offset.
pub fn civil_offset() -> FixedOffset {
    FixedOffset::east_opt(CIVIL_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix())
}

/// Converts a UTC instant to civil time.
pub fn to_civil(at: DateTime<Utc>) -> DateTime<FixedOffset> {
    at.with_timezone(&civil_offset())
}

/// `2024-01-01_10-00-00_AM`, used in clip names.
pub fn clip_stamp(at: DateTime<Utc>) -> String {
    to_civil(at).format("%Y-%m-%d_%I-%M-%S_%p").to_string()
}

/// `2024-01-01_10-00-00`, used in transcript file names.
pub fn session_stamp(at: DateTime<Utc>) -> String {
    to_civil(at).format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// `2024-01-01 10:00:00 AM`, used for transcript lines.
pub fn line_stamp(at: DateTime<Utc>) -> String {
    to_civil(at).format("%Y-%m-%d %I:%M:%S %p").to_string()
}
