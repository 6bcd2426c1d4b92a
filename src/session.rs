//! In-memory session state: generation history and the displayed image.

use tracing::debug;

use crate::studio::EditResult;

/// Previously generated images, most recent first. Append-only.
#[derive(Debug, Default)]
pub struct GenerationHistory {
    entries: Vec<String>,
}

impl GenerationHistory {
    /// Record a newly generated image.
    pub fn record(&mut self, image_url: String) {
        self.entries.insert(0, image_url);
    }

    /// Images, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been generated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Identifies one in-flight edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// What [`Session::apply`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The image is now displayed and recorded in history.
    Displayed,
    /// The call succeeded without an image; carries the model's explanation.
    NoImage(Option<String>),
    /// A newer request was issued; the result was dropped.
    Superseded,
}

/// Session state shared by successive generations.
#[derive(Debug, Default)]
pub struct Session {
    history: GenerationHistory,
    current: Option<String>,
    issued: u64,
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request; older tickets become stale.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Apply a finished edit if its ticket is still the latest one.
    pub fn apply(&mut self, ticket: RequestTicket, result: &EditResult) -> Applied {
        if ticket.0 != self.issued {
            debug!(ticket = ticket.0, latest = self.issued, "dropping superseded result");
            return Applied::Superseded;
        }
        match &result.image_url {
            Some(url) => {
                self.current = Some(url.clone());
                self.history.record(url.clone());
                Applied::Displayed
            }
            None => Applied::NoImage(result.text.clone()),
        }
    }

    /// The displayed image, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Generation history.
    #[must_use]
    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_image(url: &str) -> EditResult {
        EditResult { image_url: Some(url.into()), text: None }
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut session = Session::new();
        for url in ["data:a", "data:b", "data:c"] {
            let ticket = session.begin();
            assert_eq!(session.apply(ticket, &with_image(url)), Applied::Displayed);
        }
        let urls: Vec<&str> = session.history().iter().collect();
        assert_eq!(urls, ["data:c", "data:b", "data:a"]);
        assert_eq!(session.current(), Some("data:c"));
    }

    #[test]
    fn superseded_result_is_dropped() {
        let mut session = Session::new();
        let first = session.begin();
        let second = session.begin();
        assert!(first < second);

        assert_eq!(session.apply(second, &with_image("data:new")), Applied::Displayed);
        assert_eq!(session.apply(first, &with_image("data:old")), Applied::Superseded);
        assert_eq!(session.current(), Some("data:new"));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn text_only_result_keeps_display() {
        let mut session = Session::new();
        let t = session.begin();
        session.apply(t, &with_image("data:kept"));

        let t = session.begin();
        let result = EditResult { image_url: None, text: Some("policy refusal".into()) };
        assert_eq!(session.apply(t, &result), Applied::NoImage(Some("policy refusal".into())));
        assert_eq!(session.current(), Some("data:kept"));
        assert_eq!(session.history().len(), 1);
        assert!(!session.history().is_empty());
    }
}
