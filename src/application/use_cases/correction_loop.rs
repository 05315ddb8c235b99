//! Self-correcting SQL generation loop
//!
//! Generating → Validating → {Executing | Correcting} → Done | Exhausted
//!
//! The loop runs at most `max_retries` generate/validate cycles per question. A
//! corrective prompt is only issued between two validations, so the completion
//! service and the validator are each called at most `max_retries` times. Every
//! step is awaited before the next one starts.
//!
//! Validation failures are folded into the next prompt. Completion failures and
//! execution failures end the loop and reach the caller.

use super::candidate_extractor::CandidateExtractor;
use super::loop_events::{EventSink, TracingEventSink};
use super::prompt_builder::PromptBuilder;
use super::query_executor::QueryExecutor;
use super::sql_validator::{SqlValidator, ValidatedQuery};
use crate::domain::agent_config::AgentConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::loop_event::{EventOutcome, LoopEvent, Stage};
use crate::domain::query::{Attempt, QueryAnswer, ValidationResult};
use crate::infrastructure::db::QueryStore;
use crate::infrastructure::llm_clients::CompletionService;
use crate::infrastructure::response::clean_llm_response;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Responses shorter than this are flagged before extraction.
const SHORT_RESPONSE_CHARS: usize = 20;

pub struct CorrectionController {
    completion: Arc<dyn CompletionService + Send + Sync>,
    extractor: CandidateExtractor,
    validator: SqlValidator,
    executor: QueryExecutor,
    prompts: PromptBuilder,
    events: Arc<dyn EventSink + Send + Sync>,
    max_retries: u32,
}

impl CorrectionController {
    pub fn new(
        config: &AgentConfig,
        completion: Arc<dyn CompletionService + Send + Sync>,
        store: Arc<dyn QueryStore + Send + Sync>,
    ) -> Result<Self> {
        if config.max_retries == 0 {
            return Err(AppError::ConfigError(
                "max_retries must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            completion,
            extractor: CandidateExtractor::default(),
            validator: SqlValidator::new(store.clone(), &config.denylist)?,
            executor: QueryExecutor::new(store),
            prompts: PromptBuilder::new(&config.schema, &config.examples, &config.rules),
            events: Arc::new(TracingEventSink),
            max_retries: config.max_retries,
        })
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink + Send + Sync>) -> Self {
        self.events = events;
        self
    }

    pub fn with_extractor(mut self, extractor: CandidateExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Answer one question. Attempt state lives in this call only.
    pub async fn run(&self, question: &str) -> Result<QueryAnswer> {
        let run_id = Uuid::new_v4();
        info!(%run_id, "Question: {}", question);

        let mut attempts: Vec<Attempt> = Vec::with_capacity(self.max_retries as usize);
        let mut stage = Stage::Generating;
        let mut prompt = self.prompts.initial(question);
        let mut index: u32 = 1;

        loop {
            let candidate = self.generate(run_id, index, stage, &prompt).await?;

            self.emit(run_id, index, Stage::Validating, EventOutcome::Started);
            match self.validator.admit(&candidate).await {
                Ok(query) => {
                    self.emit(run_id, index, Stage::Validating, EventOutcome::Passed);
                    attempts.push(Attempt {
                        index,
                        candidate,
                        outcome: ValidationResult::Valid,
                    });
                    return self.execute(run_id, index, question, query, attempts).await;
                }
                Err(outcome) => {
                    let error = outcome.to_string();
                    self.emit(
                        run_id,
                        index,
                        Stage::Validating,
                        EventOutcome::Rejected {
                            error: error.clone(),
                        },
                    );

                    if index >= self.max_retries {
                        self.emit(
                            run_id,
                            index,
                            Stage::Exhausted,
                            EventOutcome::Failed {
                                error: error.clone(),
                            },
                        );
                        error!(
                            %run_id,
                            "Could not generate valid SQL after {} attempts", index
                        );
                        return Err(AppError::RetryExhausted {
                            attempts: index,
                            last_candidate: candidate,
                            last_error: error,
                        });
                    }

                    prompt = self.prompts.corrective(question, &candidate, &error);
                    attempts.push(Attempt {
                        index,
                        candidate,
                        outcome,
                    });
                    stage = Stage::Correcting;
                    index += 1;
                }
            }
        }
    }

    async fn generate(&self, run_id: Uuid, index: u32, stage: Stage, prompt: &str) -> Result<String> {
        self.emit(run_id, index, stage, EventOutcome::Started);

        let raw = match self.completion.complete(prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                self.emit(
                    run_id,
                    index,
                    stage,
                    EventOutcome::Failed {
                        error: e.to_string(),
                    },
                );
                return Err(e);
            }
        };

        if raw.trim().chars().count() < SHORT_RESPONSE_CHARS {
            self.emit(
                run_id,
                index,
                stage,
                EventOutcome::ShortResponse {
                    response: raw.clone(),
                },
            );
        }

        let candidate = self.extractor.extract(&clean_llm_response(&raw));
        self.emit(
            run_id,
            index,
            stage,
            EventOutcome::CandidateExtracted {
                candidate: candidate.clone(),
            },
        );
        Ok(candidate)
    }

    async fn execute(
        &self,
        run_id: Uuid,
        index: u32,
        question: &str,
        query: ValidatedQuery,
        attempts: Vec<Attempt>,
    ) -> Result<QueryAnswer> {
        self.emit(run_id, index, Stage::Executing, EventOutcome::Started);

        match self.executor.execute(&query).await {
            Ok(result) => {
                self.emit(
                    run_id,
                    index,
                    Stage::Done,
                    EventOutcome::Completed {
                        row_count: result.row_count,
                    },
                );
                Ok(QueryAnswer {
                    question: question.to_string(),
                    sql: query.into_string(),
                    result,
                    attempts,
                })
            }
            Err(e) => {
                self.emit(
                    run_id,
                    index,
                    Stage::Executing,
                    EventOutcome::Failed {
                        error: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    fn emit(&self, run_id: Uuid, attempt: u32, stage: Stage, outcome: EventOutcome) {
        self.events
            .emit(&LoopEvent::new(run_id, attempt, stage, outcome));
    }
}
