//! Workflow Event Logger
//!
//! Every controller transition, status announcement, and analysis request is
//! written as one structured record under the `workflow_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use vizassist_core::{Mode, Operation};

pub const EVENT_TARGET: &str = "workflow_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    Transition {
        action: &'static str,
        from: Mode,
        to: Mode,
    },
    Status {
        message: String,
        spoken: bool,
    },
    RequestStarted {
        request_id: u64,
        operation: Operation,
    },
    RequestFinished {
        request_id: u64,
        operation: Operation,
        ok: bool,
        /// False when the user moved on before the response arrived.
        applied: bool,
    },
    Rejected {
        action: &'static str,
        reason: &'static str,
    },
    Error {
        action: &'static str,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub timestamp: DateTime<Utc>,
    pub event: WorkflowEvent,
}

pub struct WorkflowEventLogger;

impl WorkflowEventLogger {
    pub fn log(event: WorkflowEvent) {
        let entry = EventLogEntry {
            timestamp: Utc::now(),
            event,
        };
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: EVENT_TARGET, event = %json, "Workflow event"),
            Err(_) => info!(target: EVENT_TARGET, event = ?entry, "Workflow event"),
        }
    }
}
