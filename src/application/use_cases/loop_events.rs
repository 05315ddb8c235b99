use crate::domain::loop_event::{EventOutcome, LoopEvent};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Receives every event the correction loop emits, in order.
pub trait EventSink {
    fn emit(&self, event: &LoopEvent);
}

/// Forwards loop events to `tracing`.
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &LoopEvent) {
        let run_id = event.run_id;
        let attempt = event.attempt;
        let stage = event.stage;
        match &event.outcome {
            EventOutcome::Started => info!(%run_id, attempt, ?stage, "Stage started"),
            EventOutcome::CandidateExtracted { candidate } => {
                info!(%run_id, attempt, ?stage, "Candidate SQL: {}", candidate)
            }
            EventOutcome::ShortResponse { response } => {
                warn!(%run_id, attempt, ?stage, "Short response from model: '{}'", response)
            }
            EventOutcome::Passed => info!(%run_id, attempt, ?stage, "Validation passed"),
            EventOutcome::Rejected { error } => {
                warn!(%run_id, attempt, ?stage, "Validation failed: {}", error)
            }
            EventOutcome::Completed { row_count } => {
                info!(%run_id, attempt, ?stage, row_count, "Query completed")
            }
            EventOutcome::Failed { error } => warn!(%run_id, attempt, ?stage, "Failed: {}", error),
        }
    }
}

/// Keeps events in memory so a host can inspect or replay them.
#[derive(Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<LoopEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LoopEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &LoopEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
