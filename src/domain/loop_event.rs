use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// States of the correction loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Generating,
    Validating,
    Correcting,
    Executing,
    Done,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    Started,
    CandidateExtracted { candidate: String },
    ShortResponse { response: String },
    Passed,
    Rejected { error: String },
    Completed { row_count: usize },
    Failed { error: String },
}

/// One structured trace record emitted by the correction loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopEvent {
    pub run_id: Uuid,
    pub attempt: u32,
    pub stage: Stage,
    pub outcome: EventOutcome,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl LoopEvent {
    pub fn new(run_id: Uuid, attempt: u32, stage: Stage, outcome: EventOutcome) -> Self {
        Self {
            run_id,
            attempt,
            stage,
            outcome,
            created_at: chrono::Utc::now(),
        }
    }
}
