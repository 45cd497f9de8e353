//! Indexing tasks handed to the executor through the task queue

use crate::indexing::context::IndexingContext;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexingAction {
    Add,
    Delete,
    /// Flush and close the context; no more tasks follow for it
    Finish,
}

impl std::fmt::Display for IndexingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IndexingAction::Add => "ADD",
            IndexingAction::Delete => "DELETE",
            IndexingAction::Finish => "FINISH",
        })
    }
}

#[derive(Debug, Clone)]
pub struct IndexingTask {
    pub action: IndexingAction,
    /// Repository-relative path; `None` for FINISH
    pub target_path: Option<String>,
    pub context: Arc<IndexingContext>,
}

impl IndexingTask {
    pub fn add(context: Arc<IndexingContext>, path: impl Into<String>) -> Self {
        Self {
            action: IndexingAction::Add,
            target_path: Some(path.into()),
            context,
        }
    }

    pub fn delete(context: Arc<IndexingContext>, path: impl Into<String>) -> Self {
        Self {
            action: IndexingAction::Delete,
            target_path: Some(path.into()),
            context,
        }
    }

    pub fn finish(context: Arc<IndexingContext>) -> Self {
        Self {
            action: IndexingAction::Finish,
            target_path: None,
            context,
        }
    }
}

impl std::fmt::Display for IndexingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target_path {
            Some(path) => write!(f, "{} {} [{}]", self.action, path, self.context.id),
            None => write!(f, "{} [{}]", self.action, self.context.id),
        }
    }
}
