//! Recording adapters that capture interactions to cassettes.

pub mod generative_service;
