//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod generative_service;

pub use generative_service::{
    EditRequest, Fragment, GenerativeService, ImageRequest, ServiceFuture, ServiceReply,
    StructuredRequest, TextRequest,
};
