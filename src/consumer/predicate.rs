//! Per-file "wants this file" decision for known consumers

use crate::consumer::traits::KnownContentConsumer;
use crate::pathmatch;

/// Include/exclude patterns captured from a consumer at scan start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WantsFilePredicate {
    includes: Vec<String>,
    excludes: Vec<String>,
    case_sensitive: bool,
}

impl WantsFilePredicate {
    pub fn new(includes: Vec<String>, excludes: Vec<String>, case_sensitive: bool) -> Self {
        Self {
            includes,
            excludes,
            case_sensitive,
        }
    }

    pub fn for_consumer(consumer: &dyn KnownContentConsumer) -> Self {
        Self::new(consumer.includes(), consumer.excludes(), consumer.case_sensitive())
    }

    /// An exclude match wins over any include match
    pub fn wants(&self, path: &str) -> bool {
        if pathmatch::any_matches(&self.excludes, path, self.case_sensitive) {
            return false;
        }
        pathmatch::any_matches(&self.includes, path, self.case_sensitive)
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_includes_select_files() {
        let predicate =
            WantsFilePredicate::new(strings(&["**/*.jar", "**/*.pom"]), Vec::new(), true);
        assert!(predicate.wants("org/a/1.0/a-1.0.jar"));
        assert!(predicate.wants("a.pom"));
        assert!(!predicate.wants("a.jar.sha1"));
        assert!(!predicate.wants("b.txt"));
    }

    #[test]
    fn test_excludes_override_includes() {
        let predicate = WantsFilePredicate::new(
            strings(&["**/*.jar"]),
            strings(&["**/*-sources.jar"]),
            true,
        );
        assert!(predicate.wants("org/a/1.0/a-1.0.jar"));
        assert!(!predicate.wants("org/a/1.0/a-1.0-sources.jar"));
    }

    #[test]
    fn test_no_includes_wants_nothing() {
        let predicate = WantsFilePredicate::new(Vec::new(), Vec::new(), true);
        assert!(!predicate.wants("a.jar"));
    }

    #[test]
    fn test_case_insensitive_predicate() {
        let predicate = WantsFilePredicate::new(strings(&["**/*.jar"]), Vec::new(), false);
        assert!(predicate.wants("LIB/A.JAR"));

        let strict = WantsFilePredicate::new(strings(&["**/*.jar"]), Vec::new(), true);
        assert!(!strict.wants("LIB/A.JAR"));
    }
}
