//! Application module

pub mod cli;
pub mod runner;
pub mod startup;
pub mod styles;
