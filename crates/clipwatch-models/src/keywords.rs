//! Keyword sets derived from operator input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered sequence of lowercase, trimmed trigger keywords.
///
/// Order is significant: the first configured keyword found in a message wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Parses comma-separated operator text, dropping blank entries.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_lowercases() {
        let set = KeywordSet::parse(" Mine, CODE ,lock,, ssd ");
        assert_eq!(set.as_slice(), &["mine", "code", "lock", "ssd"]);
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(KeywordSet::parse("").is_empty());
        assert!(KeywordSet::parse(" , ,").is_empty());
    }

    #[test]
    fn test_parse_preserves_order() {
        let set = KeywordSet::parse("zeta, alpha");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_display_joins_with_comma() {
        let set = KeywordSet::parse("mine,Lock");
        assert_eq!(set.to_string(), "mine, lock");
    }
}
