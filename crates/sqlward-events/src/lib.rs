//! Structured diagnostics for sqlward.
//!
//! Builders and the database facade report non-fatal conditions (such as a
//! deprecated null comparison) and execution milestones through an
//! [`EventSink`]. Frontends pick the sink: a channel for a UI thread, a
//! collector in tests, or [`NullSink`] when nobody is listening.

mod event;
mod sink;

use std::sync::Arc;

pub use event::*;
pub use sink::*;

/// Shared handle to an event sink.
pub type EventSinkHandle = Arc<dyn EventSink>;
