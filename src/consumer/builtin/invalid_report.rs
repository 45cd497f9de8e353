//! Reports files that no known consumer recognised

use crate::consumer::error::ConsumerResult;
use crate::consumer::traits::{Consumer, InvalidContentConsumer};
use crate::scanner::RepositoryDescriptor;
use std::time::SystemTime;

pub const ID: &str = "invalid-content-report";

#[derive(Debug, Default)]
pub struct InvalidContentReportConsumer {
    repository_id: String,
    paths: Vec<String>,
}

impl InvalidContentReportConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unrecognised paths from the last scan
    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

impl Consumer for InvalidContentReportConsumer {
    fn id(&self) -> &str {
        ID
    }

    fn description(&self) -> &str {
        "Report files that are not recognised repository content"
    }

    fn begin_scan(
        &mut self,
        repository: &RepositoryDescriptor,
        _when: SystemTime,
        _execute_on_entire_repo: bool,
    ) -> ConsumerResult<()> {
        self.repository_id = repository.id.clone();
        self.paths.clear();
        Ok(())
    }

    fn process_file(&mut self, path: &str, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        log::warn!("[{}] unrecognised content: {}", self.repository_id, path);
        self.paths.push(path.to_string());
        Ok(())
    }

    fn complete_scan(&mut self, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        if !self.paths.is_empty() {
            log::warn!(
                "[{}] {} files are not recognised repository content",
                self.repository_id,
                self.paths.len()
            );
        }
        Ok(())
    }
}

impl InvalidContentConsumer for InvalidContentReportConsumer {}
