//! Request middleware and extractors.

pub mod client_meta;

pub use client_meta::ClientMeta;
