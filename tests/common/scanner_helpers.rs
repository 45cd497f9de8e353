//! Recording consumers for scanner integration tests
//!
//! Every call is appended to a shared log so tests can assert on the exact
//! interleaving of consumer calls.

use reposcan::consumer::{
    Consumer, ConsumerError, ConsumerResult, InvalidContentConsumer, KnownContentConsumer,
};
use reposcan::scanner::RepositoryDescriptor;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Calls of one consumer with the `id:` prefix removed, lifecycle calls excluded
pub fn files_seen_by(log: &CallLog, id: &str) -> Vec<String> {
    let prefix = format!("{}:", id);
    calls(log)
        .into_iter()
        .filter_map(|c| c.strip_prefix(&prefix).map(str::to_string))
        .filter(|c| !c.starts_with("begin") && c != "complete")
        .collect()
}

pub struct RecordingConsumer {
    id: String,
    includes: Vec<String>,
    excludes: Vec<String>,
    log: CallLog,
    pub fail_on: Option<String>,
    pub fail_complete: bool,
    pub process_unmodified: bool,
}

impl RecordingConsumer {
    pub fn new(id: &str, includes: &[&str], log: &CallLog) -> Self {
        Self {
            id: id.to_string(),
            includes: includes.iter().map(|s| s.to_string()).collect(),
            excludes: Vec::new(),
            log: Arc::clone(log),
            fail_on: None,
            fail_complete: false,
            process_unmodified: false,
        }
    }

    pub fn excluding(mut self, excludes: &[&str]) -> Self {
        self.excludes = excludes.iter().map(|s| s.to_string()).collect();
        self
    }

    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl Consumer for RecordingConsumer {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "records every call"
    }

    fn begin_scan(
        &mut self,
        _repository: &RepositoryDescriptor,
        _when: SystemTime,
        execute_on_entire_repo: bool,
    ) -> ConsumerResult<()> {
        self.push(format!("{}:begin:{}", self.id, execute_on_entire_repo));
        Ok(())
    }

    fn process_file(&mut self, path: &str, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(ConsumerError::processing(&self.id, path, "rejected by test"));
        }
        self.push(format!("{}:{}", self.id, path));
        Ok(())
    }

    fn complete_scan(&mut self, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
        self.push(format!("{}:complete", self.id));
        if self.fail_complete {
            return Err(ConsumerError::lifecycle(&self.id, "complete-scan", "rejected by test"));
        }
        Ok(())
    }
}

impl KnownContentConsumer for RecordingConsumer {
    fn includes(&self) -> Vec<String> {
        self.includes.clone()
    }

    fn excludes(&self) -> Vec<String> {
        self.excludes.clone()
    }

    fn process_unmodified(&self) -> bool {
        self.process_unmodified
    }
}

impl InvalidContentConsumer for RecordingConsumer {}
