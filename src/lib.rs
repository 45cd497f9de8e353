//! Repository content scanning, consumer pipeline and indexing task dispatch
//!
//! A [`scanner::RepositoryScanner`] walks an artifact repository, offers each
//! file to the consumers whose patterns want it and gathers statistics.
//! Indexing is handed off through a bounded [`queue::TaskQueue`] to an
//! [`indexing::IndexingExecutor`] running on its own thread.

pub mod app;
pub mod config;
pub mod consumer;
pub mod core;
pub mod filetypes;
pub mod indexing;
pub mod pathmatch;
pub mod queue;
pub mod scanner;
