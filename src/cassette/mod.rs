//! Cassettes: recorded service calls for offline, deterministic runs.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
