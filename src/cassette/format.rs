//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session: every call made through a port, in call order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable cassette name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Commit the recording was made from.
    pub commit: String,
    /// Recorded interactions.
    pub interactions: Vec<Interaction>,
}

/// One recorded call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Global sequence number.
    pub seq: u64,
    /// Port name (e.g., `"generative_service"`).
    pub port: String,
    /// Method name on the port (e.g., `"edit_image"`).
    pub method: String,
    /// Serialized request.
    pub input: serde_json::Value,
    /// Serialized result, `{Ok: ...}` or `{Err: "..."}`.
    pub output: serde_json::Value,
}
