//! Ant-style Path Matching
//!
//! Glob matching used by every include/exclude decision in the scanner:
//!
//! - `*` matches zero or more characters within a single path segment
//! - `?` matches exactly one character
//! - `**` matches zero or more whole path segments
//!
//! Single segments are matched with a two-pointer scan that trims fixed
//! characters from both ends of the pattern and then searches for each fixed
//! run between consecutive stars. Paths are tokenized on `/` or `\` and the
//! same strategy is applied at segment granularity, with `**` playing the role
//! of the star.

mod tokenize;

pub use tokenize::{split_root, tokenize_path};

/// Case-sensitive single segment match
pub fn matches(pattern: &str, candidate: &str) -> bool {
    match_pattern(pattern, candidate, true)
}

/// Case-sensitive path match
pub fn matches_path(pattern: &str, path: &str) -> bool {
    match_path(pattern, path, true)
}

/// True if any of `patterns` matches `path`
pub fn any_matches<S: AsRef<str>>(patterns: &[S], path: &str, case_sensitive: bool) -> bool {
    patterns
        .iter()
        .any(|pattern| match_path(pattern.as_ref(), path, case_sensitive))
}

/// Match a single string against a pattern containing `*` and `?` wildcards.
///
/// `*` never has path semantics here; callers that need segment-aware
/// matching use [`match_path`].
pub fn match_pattern(pattern: &str, candidate: &str, case_sensitive: bool) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = candidate.chars().collect();
    let same = |p: char, c: char| p == '?' || chars_equal(p, c, case_sensitive);

    if !pat.contains(&'*') {
        // Without a star the lengths must agree exactly
        return pat.len() == s.len() && pat.iter().zip(&s).all(|(&p, &c)| same(p, c));
    }

    if pat.len() == 1 {
        return true;
    }

    // Exclusive end indices
    let (mut ps, mut pe) = (0usize, pat.len());
    let (mut ss, mut se) = (0usize, s.len());

    // Leading fixed characters
    while pat[ps] != '*' && ss < se {
        if !same(pat[ps], s[ss]) {
            return false;
        }
        ps += 1;
        ss += 1;
    }
    if ss == se {
        return all_stars(&pat[ps..pe]);
    }

    // Trailing fixed characters
    while pat[pe - 1] != '*' && ss < se {
        if !same(pat[pe - 1], s[se - 1]) {
            return false;
        }
        pe -= 1;
        se -= 1;
    }
    if ss == se {
        return all_stars(&pat[ps..pe]);
    }

    // pat[ps] and pat[pe - 1] are both stars from here on
    while ps != pe - 1 && ss < se {
        let next_star = match (ps + 1..pe).find(|&i| pat[i] == '*') {
            Some(i) => i,
            None => break,
        };
        if next_star == ps + 1 {
            // Adjacent stars collapse
            ps += 1;
            continue;
        }

        let run = &pat[ps + 1..next_star];
        let available = se - ss;
        if run.len() > available {
            return false;
        }
        let found = (0..=available - run.len()).find(|&offset| {
            run.iter()
                .zip(&s[ss + offset..])
                .all(|(&p, &c)| same(p, c))
        });
        match found {
            Some(offset) => {
                ps = next_star;
                ss += offset + run.len();
            }
            None => return false,
        }
    }

    all_stars(&pat[ps..pe])
}

/// Match a path against an Ant-style path pattern.
///
/// Both sides are split into segments; `**` matches any number of whole
/// segments (including none) and every other segment is compared with
/// [`match_pattern`]. An absolute path carries its root as its first token, so
/// a relative pattern never matches an absolute path and vice versa.
pub fn match_path(pattern: &str, path: &str, case_sensitive: bool) -> bool {
    let pat = tokenize_path(pattern);
    let s = tokenize_path(path);
    let absolute = |tokens: &[String]| tokens.first().is_some_and(|t| is_root(t));
    if absolute(&pat) != absolute(&s) {
        return false;
    }
    match_tokens(&pat, &s, case_sensitive)
}

fn match_tokens(pat: &[String], s: &[String], case_sensitive: bool) -> bool {
    let is_deep = |token: &String| token == "**";
    let segment = |p: &String, c: &String| {
        if is_root(p) || is_root(c) {
            return is_root(p) && is_root(c) && chars_equal_str(p, c, case_sensitive);
        }
        match_pattern(p, c, case_sensitive)
    };

    let (mut ps, mut pe) = (0usize, pat.len());
    let (mut ss, mut se) = (0usize, s.len());

    // Up to the first `**`
    while ps < pe && ss < se {
        if is_deep(&pat[ps]) {
            break;
        }
        if !segment(&pat[ps], &s[ss]) {
            return false;
        }
        ps += 1;
        ss += 1;
    }
    if ss == se {
        return pat[ps..pe].iter().all(is_deep);
    }
    if ps == pe {
        // Path has segments left but the pattern is exhausted
        return false;
    }

    // Back to the last `**`
    while ps < pe && ss < se {
        if is_deep(&pat[pe - 1]) {
            break;
        }
        if !segment(&pat[pe - 1], &s[se - 1]) {
            return false;
        }
        pe -= 1;
        se -= 1;
    }
    if ss == se {
        return pat[ps..pe].iter().all(is_deep);
    }

    while ps != pe - 1 && ss < se {
        let next_deep = match (ps + 1..pe).find(|&i| is_deep(&pat[i])) {
            Some(i) => i,
            None => break,
        };
        if next_deep == ps + 1 {
            // `**/**`
            ps += 1;
            continue;
        }

        let run = &pat[ps + 1..next_deep];
        let available = se - ss;
        if run.len() > available {
            return false;
        }
        let found = (0..=available - run.len()).find(|&offset| {
            run.iter()
                .zip(&s[ss + offset..])
                .all(|(p, c)| segment(p, c))
        });
        match found {
            Some(offset) => {
                ps = next_deep;
                ss += offset + run.len();
            }
            None => return false,
        }
    }

    pat[ps..pe].iter().all(is_deep)
}

fn all_stars(pat: &[char]) -> bool {
    pat.iter().all(|&c| c == '*')
}

fn is_root(token: &str) -> bool {
    token.ends_with('/') || token.ends_with('\\')
}

fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a == b || a.to_lowercase().eq(b.to_lowercase())
    }
}

fn chars_equal_str(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_patterns_require_equality() {
        assert!(matches("foo.jar", "foo.jar"));
        assert!(!matches("foo.jar", "foo.jars"));
        assert!(!matches("foo.jar", "fo.jar"));
        assert!(!matches("FOO.jar", "foo.jar"));
        assert!(match_pattern("FOO.jar", "foo.jar", false));
    }

    #[test]
    fn test_empty_pattern_matches_only_empty() {
        assert!(matches("", ""));
        assert!(!matches("", "a"));
    }

    #[test]
    fn test_single_star_matches_anything() {
        assert!(matches("*", ""));
        assert!(matches("*", "anything"));
        assert!(matches("*", "with/slash"));
    }

    #[test]
    fn test_star_between_fixed_runs() {
        assert!(matches("a*b", "aXXXb"));
        assert!(matches("a*b", "ab"));
        assert!(!matches("a*b", "aXXXc"));
        assert!(!matches("a*b", "a"));
    }

    #[test]
    fn test_question_mark_matches_one_character() {
        assert!(matches("?.jar", "a.jar"));
        assert!(!matches("?.jar", ".jar"));
        assert!(!matches("?.jar", "ab.jar"));
        assert!(matches("a?c*", "abcdef"));
    }

    #[test]
    fn test_multiple_and_adjacent_stars() {
        assert!(matches("*-*.jar", "foo-1.0.jar"));
        assert!(!matches("*-*.jar", "foo.jar"));
        assert!(matches("a**b", "ab"));
        assert!(matches("a**b", "axyzb"));
        assert!(matches("*foo*bar*", "xxfooyybarzz"));
        assert!(!matches("*foo*bar*", "xxbaryyfoozz"));
        assert!(matches("**", ""));
    }

    #[test]
    fn test_trailing_star_matches_rest() {
        assert!(matches("maven-metadata*", "maven-metadata-central.xml"));
        assert!(matches("maven-metadata*", "maven-metadata"));
    }

    #[test]
    fn test_pattern_longer_than_candidate_fails() {
        assert!(!matches("abc*def", "abdef"));
        assert!(!matches("*abcdef", "abc"));
    }

    #[test]
    fn test_path_deep_wildcard() {
        assert!(matches_path("**/*.jar", "org/apache/foo/1.0/foo-1.0.jar"));
        assert!(matches_path("**/*.jar", "foo.jar"));
        assert!(!matches_path("**/*.jar", "org/apache/foo/1.0/foo-1.0.pom"));
        assert!(!matches_path("org/apache/**", "org/other/x"));
        assert!(matches_path("org/apache/**", "org/apache"));
        assert!(matches_path("org/apache/**", "org/apache/maven/x.jar"));
    }

    #[test]
    fn test_double_deep_wildcard_matches_everything() {
        for path in ["a", "a/b", "org/apache/foo/1.0/foo-1.0.jar", ".index/x"] {
            assert!(matches_path("**/**", path), "{} should match", path);
        }
    }

    #[test]
    fn test_path_middle_segments() {
        assert!(matches_path("**/.svn/**", "a/b/.svn/entries"));
        assert!(matches_path("**/.svn/**", ".svn"));
        assert!(matches_path("org/**/1.0/*.pom", "org/apache/foo/1.0/foo-1.0.pom"));
        assert!(matches_path("org/**/1.0/*.pom", "org/1.0/foo-1.0.pom"));
        assert!(!matches_path("org/**/1.0/*.pom", "org/apache/foo/2.0/foo-2.0.pom"));
        assert!(matches_path("a/**/b/**/c", "a/x/b/y/z/c"));
        assert!(!matches_path("a/**/b/**/c", "a/x/y/c"));
    }

    #[test]
    fn test_path_separators_are_interchangeable() {
        assert!(matches_path("**/*.jar", "org\\apache\\foo.jar"));
        assert!(matches_path("org\\**", "org/apache/foo.jar"));
    }

    #[test]
    fn test_case_insensitive_path() {
        assert!(!matches_path("**/*.JAR", "org/foo.jar"));
        assert!(match_path("**/*.JAR", "org/foo.jar", false));
    }

    #[test]
    fn test_absolute_paths_keep_their_root() {
        assert!(matches_path("/repo/**/*.jar", "/repo/org/foo.jar"));
        assert!(!matches_path("**/*.jar", "/repo/org/foo.jar"));
        assert!(!matches_path("/repo/**", "repo/org/foo.jar"));
        assert!(!matches_path("*/repo/**", "/repo/x"));
    }

    #[test]
    fn test_any_matches() {
        let patterns = vec!["**/*.jar".to_string(), "**/*.pom".to_string()];
        assert!(any_matches(&patterns, "a/b.pom", true));
        assert!(!any_matches(&patterns, "a/b.txt", true));
        let empty: Vec<String> = Vec::new();
        assert!(!any_matches(&empty, "a/b.pom", true));
    }
}
