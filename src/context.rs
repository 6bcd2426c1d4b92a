//! Service context that bundles all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::adapters::live::gemini::GeminiService;
use crate::adapters::recording::generative_service::RecordingGenerativeService;
use crate::adapters::replaying::generative_service::ReplayingGenerativeService;
use crate::cassette::config::{load_cassette, recording_path};
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::StudioError;
use crate::ports::GenerativeService;

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Generative model port.
    pub service: Box<dyn GenerativeService>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette to disk.
    ///
    /// The context that produced this session must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<std::path::PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live Gemini context.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured or the client cannot be built.
    pub fn live(config: &Config) -> Result<Self, StudioError> {
        let key = config.gemini_key().ok_or(StudioError::MissingApiKey {
            provider: "Gemini".into(),
            env_var: "GEMINI_API_KEY".into(),
        })?;
        let service = GeminiService::new(
            key,
            config.service.base_url.clone(),
            Duration::from_secs(config.service.timeout_secs),
        )?;
        Ok(Self { service: Box::new(service) })
    }

    /// Create a recording context that wraps the live service with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), StudioError> {
        let live_ctx = Self::live(config)?;

        let started = chrono::Utc::now();
        let path = recording_path(started);
        let name = format!("{}-generative_service", started.format("%Y-%m-%dT%H-%M-%S"));
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, name, get_commit_hash())));

        let service = RecordingGenerativeService::new(live_ctx.service, Arc::clone(&recorder));

        Ok((Self { service: Box::new(service) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, StudioError> {
        let replayer = load_cassette(path)
            .map_err(|e| StudioError::Config(format!("Failed to load cassette: {e}")))?;
        let service = ReplayingGenerativeService::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { service: Box::new(service) })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
