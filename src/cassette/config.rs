//! Cassette file locations and loading.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Directory that recordings are written under.
pub const CASSETTE_ROOT: &str = ".product-studio/cassettes";

/// Path of the cassette for a recording started at `started`.
#[must_use]
pub fn recording_path(started: DateTime<Utc>) -> PathBuf {
    let stamp = started.format("%Y-%m-%dT%H-%M-%S").to_string();
    PathBuf::from(CASSETTE_ROOT).join(stamp).join("generative_service.cassette.yaml")
}

/// Load a cassette file and create a replayer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    let cassette: Cassette = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
    Ok(CassetteReplayer::new(&cassette))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn load_hand_written_cassette() {
        let dir = std::env::temp_dir().join("product_studio_cassette_load_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("idea.cassette.yaml");
        std::fs::write(
            &path,
            "name: idea\n\
             recorded_at: \"2026-10-19T00:00:00Z\"\n\
             commit: test\n\
             interactions:\n  \
               - seq: 0\n    \
                 port: generative_service\n    \
                 method: complete_text\n    \
                 input: {}\n    \
                 output:\n      \
                   Ok: a rainy alley\n",
        )
        .unwrap();

        let mut replayer = load_cassette(&path).unwrap();
        let text: String = replayer.replay("generative_service", "complete_text").unwrap();
        assert_eq!(text, "a rainy alley");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_nonexistent_fails() {
        assert!(load_cassette(Path::new("/nonexistent/cassette.yaml")).is_err());
    }

    #[test]
    fn recording_path_is_timestamped() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        assert_eq!(
            recording_path(at),
            PathBuf::from(".product-studio/cassettes/2026-10-19T08-30-00/generative_service.cassette.yaml")
        );
    }
}
