//! Captures port calls and writes them as a YAML cassette.

use std::fmt::Display;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use super::format::{Cassette, Interaction};

/// Accumulates interactions until [`CassetteRecorder::finish`] writes them out.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Create a recorder that will write to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: commit.into(),
            interactions: Vec::new(),
        }
    }

    /// Record one call and its outcome using the `{Ok: ..}` / `{Err: ".."}` convention.
    ///
    /// # Errors
    ///
    /// Returns an error if the input or output cannot be serialized.
    pub fn record_call<I, T, E>(
        &mut self,
        port: &str,
        method: &str,
        input: &I,
        result: &Result<T, E>,
    ) -> Result<(), serde_json::Error>
    where
        I: Serialize,
        T: Serialize,
        E: Display,
    {
        let output = match result {
            Ok(value) => json!({ "Ok": serde_json::to_value(value)? }),
            Err(e) => json!({ "Err": e.to_string() }),
        };
        self.push(port, method, serde_json::to_value(input)?, output);
        Ok(())
    }

    fn push(&mut self, port: &str, method: &str, input: Value, output: Value) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.to_string(),
            method: method.to_string(),
            input,
            output,
        });
    }

    /// Write the cassette to disk, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}
