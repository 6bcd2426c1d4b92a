//! Replaying adapter for the `GenerativeService` port.

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;
use crate::error::StudioError;
use crate::ports::generative_service::{
    EditRequest, GenerativeService, ImageRequest, ServiceFuture, ServiceReply, StructuredRequest,
    TextRequest,
};

const PORT: &str = "generative_service";

/// Serves recorded replies from a cassette without touching the network.
pub struct ReplayingGenerativeService {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingGenerativeService {
    /// Create a replaying service backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn next(&self, method: &'static str) -> ServiceFuture<'_> {
        let result = self
            .replayer
            .lock()
            .map_err(|e| format!("Replayer lock poisoned: {e}"))
            .and_then(|mut r| r.replay::<ServiceReply>(PORT, method))
            .map_err(StudioError::service);
        Box::pin(async move { result })
    }
}

impl GenerativeService for ReplayingGenerativeService {
    fn complete_text(&self, _request: &TextRequest) -> ServiceFuture<'_> {
        self.next("complete_text")
    }

    fn describe_image(&self, _request: &ImageRequest) -> ServiceFuture<'_> {
        self.next("describe_image")
    }

    fn complete_structured(&self, _request: &StructuredRequest) -> ServiceFuture<'_> {
        self.next("complete_structured")
    }

    fn edit_image(&self, _request: &EditRequest) -> ServiceFuture<'_> {
        self.next("edit_image")
    }
}
