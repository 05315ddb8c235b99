pub mod use_cases;

pub use use_cases::candidate_extractor::CandidateExtractor;
pub use use_cases::correction_loop::CorrectionController;
pub use use_cases::loop_events::{EventSink, RecordingEventSink, TracingEventSink};
pub use use_cases::prompt_builder::PromptBuilder;
pub use use_cases::query_executor::QueryExecutor;
pub use use_cases::sql_validator::{SqlValidator, ValidatedQuery};
