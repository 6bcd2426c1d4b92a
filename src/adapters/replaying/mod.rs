//! Replaying adapters that serve recorded interactions from cassettes.

pub mod generative_service;
