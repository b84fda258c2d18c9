//! Core types and error definitions for the Thrive coaching engine.
//!
//! This crate provides the foundational types shared across all Thrive
//! crates: the unified error enum, chat message representations, audit
//! step records, and the progress sink used to stream live status to a
//! caller while a turn runs.
//!
//! # Main types
//!
//! - [`ThriveError`] — Unified error enum for all Thrive subsystems.
//! - [`ThriveResult`] — Convenience alias for `Result<T, ThriveError>`.
//! - [`Role`] / [`ChatMessage`] — Messages sent to the reasoning model.
//! - [`StepRecord`] — One audit entry per external call.
//! - [`ProgressSink`] / [`ProgressEvent`] — One-way live status events.

/// Chat message types for reasoning calls.
pub mod message;
/// Progress sink trait and event payloads.
pub mod progress;
/// Audit step records.
pub mod step;

pub use message::{ChatMessage, Role};
pub use progress::{NullSink, ProgressEvent, ProgressSink};
pub use step::StepRecord;

/// Top-level error type for the Thrive engine.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Debug, thiserror::Error)]
pub enum ThriveError {
    /// An error originating from a reasoning loop.
    #[error("Agent error: {0}")]
    Agent(String),

    /// An error from an outbound HTTP request (e.g. model API call).
    #[error("HTTP error: {0}")]
    Http(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the memory / retrieval subsystem.
    #[error("Memory error: {0}")]
    Memory(String),

    /// A dispatch request named a specialist that is not registered.
    #[error("Unknown specialist: {0}")]
    UnknownSpecialist(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`ThriveError`].
pub type ThriveResult<T> = Result<T, ThriveError>;
