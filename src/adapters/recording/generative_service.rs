//! Recording adapter for the `GenerativeService` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;
use crate::ports::generative_service::{
    EditRequest, GenerativeService, ImageRequest, ServiceFuture, ServiceReply, StructuredRequest,
    TextRequest,
};

const PORT: &str = "generative_service";

/// Records every call while delegating to an inner service.
pub struct RecordingGenerativeService {
    inner: Box<dyn GenerativeService>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGenerativeService {
    /// Wrap `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn GenerativeService>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn record<I: Serialize>(
        &self,
        method: &str,
        input: &I,
        result: &Result<ServiceReply, crate::error::StudioError>,
    ) {
        let Ok(mut recorder) = self.recorder.lock() else {
            warn!(method, "recorder lock poisoned; interaction not recorded");
            return;
        };
        if let Err(e) = recorder.record_call(PORT, method, input, result) {
            warn!(method, error = %e, "failed to record interaction");
        }
    }
}

impl GenerativeService for RecordingGenerativeService {
    fn complete_text(&self, request: &TextRequest) -> ServiceFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.complete_text(&request).await;
            self.record("complete_text", &request, &result);
            result
        })
    }

    fn describe_image(&self, request: &ImageRequest) -> ServiceFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.describe_image(&request).await;
            self.record("describe_image", &request, &result);
            result
        })
    }

    fn complete_structured(&self, request: &StructuredRequest) -> ServiceFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.complete_structured(&request).await;
            self.record("complete_structured", &request, &result);
            result
        })
    }

    fn edit_image(&self, request: &EditRequest) -> ServiceFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.edit_image(&request).await;
            self.record("edit_image", &request, &result);
            result
        })
    }
}
