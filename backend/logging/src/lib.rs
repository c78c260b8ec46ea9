//! Structured logging for vizassist.
//!
//! Console plus rolling NDJSON file output, and a dedicated target for
//! workflow transition events.

pub mod event_logger;
pub mod logger;

pub use event_logger::{WorkflowEvent, WorkflowEventLogger, EVENT_TARGET};
pub use logger::init_logger;
