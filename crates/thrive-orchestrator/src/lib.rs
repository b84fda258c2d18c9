//! The supervising layer of Thrive.
//!
//! A turn flows through [`Coach::run_turn`]: best-effort profile
//! extraction, then a bounded supervising loop that delegates to the
//! domain specialists through the [`Dispatcher`] and composes the final
//! answer. Everything below the top-level reasoning calls degrades into
//! labeled observations rather than errors.

/// Parallel specialist dispatch.
pub mod dispatcher;
/// Supervising loop and turn entry point.
pub mod engine;
/// Rule-based profile extraction.
pub mod extract;

pub use dispatcher::Dispatcher;
pub use engine::{Coach, TurnOutcome};
