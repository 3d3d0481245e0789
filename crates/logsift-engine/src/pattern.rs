use std::collections::HashMap;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

/// A pattern that cannot match any input
const NEVER_MATCH: &str = r"[^\s\S]";

/// Memo capacity; the whole cache is flushed when it fills up
const MAX_CACHE_SIZE: usize = 500;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct PatternKey {
    keyword: String,
    is_regex: bool,
    case_sensitive: bool,
}

/// Compiles keyword/regex patterns into reusable matchers
///
/// Keyword patterns are escaped and matched as unanchored substrings;
/// regex patterns are compiled as written. An invalid pattern degrades to
/// a matcher that never matches, so one bad rule cannot abort a run.
/// Compiled matchers are memoized by (keyword, is_regex, case_sensitive).
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: HashMap<PatternKey, Arc<Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&mut self, keyword: &str, is_regex: bool, case_sensitive: bool) -> Arc<Regex> {
        let key = PatternKey {
            keyword: keyword.to_string(),
            is_regex,
            case_sensitive,
        };
        if let Some(matcher) = self.entries.get(&key) {
            return Arc::clone(matcher);
        }

        let matcher = Arc::new(build_matcher(keyword, is_regex, case_sensitive));

        // Full flush, not per-entry eviction: the working set of distinct
        // rules per session is small and recompilation is cheap.
        if self.entries.len() >= MAX_CACHE_SIZE {
            self.entries.clear();
        }
        self.entries.insert(key, Arc::clone(&matcher));
        matcher
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_matcher(keyword: &str, is_regex: bool, case_sensitive: bool) -> Regex {
    let source = if is_regex {
        keyword.to_string()
    } else {
        regex::escape(keyword)
    };

    match RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(matcher) => matcher,
        Err(err) => {
            tracing::warn!(pattern = keyword, %err, "invalid filter pattern, rule will never match");
            Regex::new(NEVER_MATCH).expect("never-match pattern is valid")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_is_escaped() {
        let mut cache = PatternCache::new();
        let matcher = cache.compile("a.b", false, true);
        assert!(matcher.is_match("a.b"));
        assert!(!matcher.is_match("axb"));
    }

    #[test]
    fn test_regex_mode_compiles_pattern() {
        let mut cache = PatternCache::new();
        let matcher = cache.compile(r"^\d{3} ", true, true);
        assert!(matcher.is_match("404 not found"));
        assert!(!matcher.is_match("error 404"));
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let mut cache = PatternCache::new();
        let insensitive = cache.compile("error", false, false);
        assert!(insensitive.is_match("ERROR: disk full"));

        let sensitive = cache.compile("error", false, true);
        assert!(!sensitive.is_match("ERROR: disk full"));
        assert!(sensitive.is_match("error: disk full"));
    }

    #[test]
    fn test_invalid_regex_never_matches() {
        let mut cache = PatternCache::new();
        let matcher = cache.compile("(unclosed", true, true);
        assert!(!matcher.is_match(""));
        assert!(!matcher.is_match("(unclosed"));
        assert!(!matcher.is_match("anything at all"));
    }

    #[test]
    fn test_cache_returns_same_matcher() {
        let mut cache = PatternCache::new();
        let a = cache.compile("error", false, false);
        let b = cache.compile("error", false, false);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        // Different flags are a different cache entry
        let c = cache.compile("error", false, true);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_flushes_completely_when_full() {
        let mut cache = PatternCache::new();
        for i in 0..MAX_CACHE_SIZE {
            cache.compile(&format!("pattern-{i}"), false, false);
        }
        assert_eq!(cache.len(), MAX_CACHE_SIZE);

        cache.compile("one-more", false, false);
        assert_eq!(cache.len(), 1);
    }
}
