//! Clip file naming.

use chrono::{DateTime, Utc};

use crate::clock::clip_stamp;

/// Characters that are invalid in file names on at least one platform.
const INVALID_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum length, in characters, of one sanitized name component.
pub const MAX_COMPONENT_LEN: usize = 200;

/// Placeholder for a component that is empty after sanitizing.
const EMPTY_COMPONENT: &str = "unnamed";

/// Makes one name component safe for every supported filesystem.
///
/// Invalid characters become `_`, leading and trailing dots and spaces are
/// stripped, and the result is cut to [`MAX_COMPONENT_LEN`] characters.
pub fn sanitize_component(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == '.' || c == ' ');
    let truncated: String = trimmed.chars().take(MAX_COMPONENT_LEN).collect();

    if truncated.is_empty() {
        EMPTY_COMPONENT.to_string()
    } else {
        truncated
    }
}

/// Builds the target file name for a saved clip.
///
/// `{chatter}_{keyword}_{YYYY-MM-DD_hh-mm-ss_AM}{extension}` in UTC+8 civil
/// time. `extension` includes its leading dot, or is empty. Two clips for the
/// same chatter and keyword within one second get the same name.
pub fn artifact_name(chatter: &str, keyword: &str, at: DateTime<Utc>, extension: &str) -> String {
    format!(
        "{}_{}_{}{}",
        sanitize_component(chatter),
        sanitize_component(keyword),
        clip_stamp(at),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_artifact_name_scenario() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(
            artifact_name("alice", "lock", at, ".mp4"),
            "alice_lock_2024-01-01_10-00-00_AM.mp4"
        );
    }

    #[test]
    fn test_sanitize_replaces_invalid_chars() {
        assert_eq!(sanitize_component("a<b>c:d\"e/f\\g|h?i*j"), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_sanitize_trims_dots_and_spaces() {
        assert_eq!(sanitize_component(" ..name.. "), "name");
        assert_eq!(sanitize_component("a.b"), "a.b");
    }

    #[test]
    fn test_sanitize_empty_becomes_unnamed() {
        assert_eq!(sanitize_component(""), "unnamed");
        assert_eq!(sanitize_component(" . . "), "unnamed");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_component(&long).chars().count(), MAX_COMPONENT_LEN);

        let wide = "é".repeat(300);
        assert_eq!(sanitize_component(&wide).chars().count(), MAX_COMPONENT_LEN);
    }

    #[test]
    fn test_name_never_contains_invalid_chars() {
        let at = Utc::now();
        let inputs = ["<<>>", "a/b\\c", "???", "*:*", "\"quoted\"", "|pipe|", "plain"];
        for chatter in inputs {
            for keyword in inputs {
                let name = artifact_name(chatter, keyword, at, ".mkv");
                assert!(
                    !name.contains(INVALID_CHARS.as_slice()),
                    "invalid char in {name}"
                );
            }
        }
    }

    #[test]
    fn test_same_second_collides() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(
            artifact_name("bob", "ssd", at, ".mp4"),
            artifact_name("bob", "ssd", at, ".mp4")
        );
    }

    #[test]
    fn test_empty_extension() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(artifact_name("", "", at, ""), "unnamed_unnamed_2024-01-01_10-00-00_AM");
    }
}
