//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::format::Cassette;

/// Replays a cassette. Each `(port, method)` pair has its own queue, so calls
/// to different methods may interleave differently than when recorded.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Value>>,
}

impl CassetteReplayer {
    /// Index a loaded cassette by port and method, keeping `seq` order.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut interactions: Vec<_> = cassette.interactions.iter().collect();
        interactions.sort_by_key(|i| i.seq);

        let mut queues: HashMap<(String, String), VecDeque<Value>> = HashMap::new();
        for interaction in interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.output.clone());
        }
        Self { queues }
    }

    /// Take the next recorded output for `port::method`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing (more) was recorded for the pair.
    pub fn next_output(&mut self, port: &str, method: &str) -> Result<Value, String> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(format!(
                "Cassette has no interactions for {port}::{method}. Recorded: [{}]",
                available.join(", ")
            ));
        };
        queue
            .pop_front()
            .ok_or_else(|| format!("Cassette exhausted: every {port}::{method} call was replayed"))
    }

    /// Take the next output and decode it as a recorded `Result`.
    ///
    /// A recorded `Err` comes back as its message.
    ///
    /// # Errors
    ///
    /// Returns an error for a recorded failure, an exhausted cassette, or an
    /// output that does not deserialize as `T`.
    pub fn replay<T: DeserializeOwned>(&mut self, port: &str, method: &str) -> Result<T, String> {
        let output = self.next_output(port, method)?;
        if let Some(err) = output.get("Err") {
            return Err(err.as_str().unwrap_or("replayed error").to_string());
        }
        let value = output.get("Ok").cloned().unwrap_or(output);
        serde_json::from_value(value)
            .map_err(|e| format!("Recorded {port}::{method} output does not match: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, method: &str, output: Value) -> Interaction {
        Interaction {
            seq,
            port: "generative_service".into(),
            method: method.into(),
            input: json!({}),
            output,
        }
    }

    fn replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        })
    }

    #[test]
    fn replays_each_method_in_seq_order() {
        let mut r = replayer(vec![
            interaction(2, "edit_image", json!({"Ok": "second"})),
            interaction(0, "edit_image", json!({"Ok": "first"})),
            interaction(1, "complete_text", json!({"Ok": "idea"})),
        ]);
        assert_eq!(r.replay::<String>("generative_service", "complete_text").unwrap(), "idea");
        assert_eq!(r.replay::<String>("generative_service", "edit_image").unwrap(), "first");
        assert_eq!(r.replay::<String>("generative_service", "edit_image").unwrap(), "second");
    }

    #[test]
    fn recorded_error_replays_as_error() {
        let mut r = replayer(vec![interaction(0, "edit_image", json!({"Err": "quota exceeded"}))]);
        let err = r.replay::<String>("generative_service", "edit_image").unwrap_err();
        assert_eq!(err, "quota exceeded");
    }

    #[test]
    fn exhausted_queue_errors() {
        let mut r = replayer(vec![interaction(0, "edit_image", json!({"Ok": "once"}))]);
        let _ = r.next_output("generative_service", "edit_image").unwrap();
        let err = r.next_output("generative_service", "edit_image").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
    }

    #[test]
    fn unknown_method_lists_recorded_pairs() {
        let mut r = replayer(vec![interaction(0, "edit_image", json!({"Ok": 1}))]);
        let err = r.next_output("generative_service", "describe_image").unwrap_err();
        assert!(err.contains("generative_service::edit_image"));
    }
}
