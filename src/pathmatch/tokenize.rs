//! Path tokenization for segment-wise matching

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Split a leading filesystem root off `path`.
///
/// Recognises a leading separator (`/x`, `\x`) and a drive letter followed by
/// a separator (`C:\x`, `c:/x`). Anything else, including a bare `C:` with no
/// separator, has no root and the whole string is treated as relative.
pub fn split_root(path: &str) -> (Option<&str>, &str) {
    let bytes = path.as_bytes();

    if let Some(&first) = bytes.first() {
        if first == b'/' || first == b'\\' {
            return (Some(&path[..1]), &path[1..]);
        }
    }

    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
    {
        return (Some(&path[..3]), &path[3..]);
    }

    (None, path)
}

/// Break a path into its segments, dropping empty segments.
///
/// An absolute path yields its root (for example `/` or `C:\`) as the first
/// token.
pub fn tokenize_path(path: &str) -> Vec<String> {
    let (root, rest) = split_root(path);
    let mut tokens = Vec::new();

    if let Some(root) = root {
        tokens.push(root.to_string());
    }

    tokens.extend(
        rest.split(SEPARATORS)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string),
    );

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_tokens() {
        assert_eq!(tokenize_path("org/apache/foo.jar"), vec!["org", "apache", "foo.jar"]);
        assert_eq!(tokenize_path("org//apache/"), vec!["org", "apache"]);
        assert_eq!(tokenize_path("org\\apache"), vec!["org", "apache"]);
        assert!(tokenize_path("").is_empty());
    }

    #[test]
    fn test_absolute_path_root_token() {
        assert_eq!(tokenize_path("/repo/a"), vec!["/", "repo", "a"]);
        assert_eq!(tokenize_path("C:\\repo\\a"), vec!["C:\\", "repo", "a"]);
        assert_eq!(tokenize_path("c:/repo"), vec!["c:/", "repo"]);
    }

    #[test]
    fn test_malformed_root_degrades_to_relative() {
        assert_eq!(split_root("C:repo"), (None, "C:repo"));
        assert_eq!(split_root("1:/repo"), (None, "1:/repo"));
        assert_eq!(tokenize_path("C:"), vec!["C:"]);
    }
}
