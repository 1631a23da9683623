//! Keyword matching for chat messages.

/// Returns the first keyword, in configured order, contained in `text`.
///
/// Matching is a case-insensitive substring test against the lowercased
/// message. Keywords are expected to already be lowercase and trimmed (see
/// `KeywordSet::parse`). Empty keywords never match.
pub fn match_keyword<'k, I>(text: &str, keywords: I) -> Option<&'k str>
where
    I: IntoIterator<Item = &'k str>,
{
    let lowered = text.to_lowercase();
    keywords
        .into_iter()
        .find(|keyword| !keyword.is_empty() && lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipwatch_models::KeywordSet;

    #[test]
    fn test_first_configured_keyword_wins() {
        let keywords = KeywordSet::parse("mine, lock");
        assert_eq!(match_keyword("I found the lock code", keywords.iter()), Some("lock"));
        assert_eq!(match_keyword("lock it, it's mine", keywords.iter()), Some("mine"));
    }

    #[test]
    fn test_case_insensitive() {
        let keywords = KeywordSet::parse("ssd");
        assert_eq!(match_keyword("Look at that SSD!", keywords.iter()), Some("ssd"));
    }

    #[test]
    fn test_substring_match() {
        let keywords = KeywordSet::parse("code");
        assert_eq!(match_keyword("barcodes everywhere", keywords.iter()), Some("code"));
    }

    #[test]
    fn test_no_match() {
        let keywords = KeywordSet::parse("mine, code, lock, ssd");
        assert_eq!(match_keyword("hello chat", keywords.iter()), None);
        assert_eq!(match_keyword("", keywords.iter()), None);
    }

    #[test]
    fn test_empty_keyword_set() {
        let keywords = KeywordSet::default();
        assert_eq!(match_keyword("anything at all", keywords.iter()), None);
    }

    #[test]
    fn test_blank_keyword_ignored() {
        assert_eq!(match_keyword("text", ["", "x"]), Some("x"));
        assert_eq!(match_keyword("text", [""]), None);
    }

    #[test]
    fn test_matches_iff_some_keyword_is_substring() {
        let keywords = ["mine", "code", "lock", "ssd"];
        let samples = [
            "MINECRAFT",
            "unlock",
            "nothing here",
            "s s d",
            "Code Lock",
            "ssdcode",
        ];
        for text in samples {
            let lowered = text.to_lowercase();
            let expected = keywords.iter().copied().find(|k| lowered.contains(k));
            assert_eq!(match_keyword(text, keywords), expected, "text: {text}");
        }
    }
}
