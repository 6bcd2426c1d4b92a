//! Implementations of the generative service port.
//!
//! `live` talks to Gemini, `recording` wraps a live service and writes a
//! cassette, `replaying` serves a cassette back.

pub mod live;
pub mod recording;
pub mod replaying;
