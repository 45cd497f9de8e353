//! Non-fatal problems collected during a scan

use serde::Serialize;

/// Which consumer call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemKind {
    BeginScan,
    ProcessFile,
    CompleteScan,
}

impl std::fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ProblemKind::BeginScan => "begin-scan",
            ProblemKind::ProcessFile => "process-file",
            ProblemKind::CompleteScan => "complete-scan",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanProblem {
    pub kind: ProblemKind,
    pub consumer_id: String,
    /// Relative path, for file processing problems
    pub path: Option<String>,
    pub message: String,
}

/// Ordered list of problems, queryable by path and consumer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProblemReport {
    problems: Vec<ScanProblem>,
}

impl ProblemReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: ProblemKind,
        consumer_id: &str,
        path: Option<&str>,
        message: impl Into<String>,
    ) {
        let problem = ScanProblem {
            kind,
            consumer_id: consumer_id.to_string(),
            path: path.map(str::to_string),
            message: message.into(),
        };
        match &problem.path {
            Some(path) => log::warn!(
                "Consumer '{}' failed on {}: {}",
                problem.consumer_id,
                path,
                problem.message
            ),
            None => log::warn!(
                "Consumer '{}' failed in {}: {}",
                problem.consumer_id,
                problem.kind,
                problem.message
            ),
        }
        self.problems.push(problem);
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanProblem> {
        self.problems.iter()
    }

    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ScanProblem> + 'a {
        self.problems
            .iter()
            .filter(move |p| p.path.as_deref() == Some(path))
    }

    pub fn for_consumer<'a>(
        &'a self,
        consumer_id: &'a str,
    ) -> impl Iterator<Item = &'a ScanProblem> + 'a {
        self.problems
            .iter()
            .filter(move |p| p.consumer_id == consumer_id)
    }
}

impl<'a> IntoIterator for &'a ProblemReport {
    type Item = &'a ScanProblem;
    type IntoIter = std::slice::Iter<'a, ScanProblem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.iter()
    }
}
