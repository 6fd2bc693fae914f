//! FootballDecoded Core - Shared types library.
//!
//! This crate provides common types used across all FootballDecoded components:
//! - `site` - Public API serving blog comments and newsletter subscriptions
//! - `cli` - Command-line tools for newsletter management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no file
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, slugs, entity ids, and
//!   confirmation tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
