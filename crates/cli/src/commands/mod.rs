//! CLI command implementations.

pub mod newsletter;
