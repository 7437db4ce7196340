//! Shared types for the Lumina study pipeline.
//!
//! Everything the pipeline and gateway crates agree on lives here: the
//! error taxonomy, configuration tree, the typed domain shapes produced by
//! validation, and the spaced-repetition scheduler.

pub mod config;
pub mod document;
pub mod error;
pub mod persona;
pub mod srs;
pub mod study;

pub use error::{Error, ExtractionKind, Result, UpstreamKind, ValidationKind};
