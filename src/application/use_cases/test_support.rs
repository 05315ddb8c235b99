//! Fakes for the completion and store seams, recording how often they are called.

use crate::domain::error::{AppError, Result};
use crate::domain::query::QueryResult;
use crate::infrastructure::db::QueryStore;
use crate::infrastructure::llm_clients::CompletionService;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Plan check fails for any query mentioning `nonexistent`, or for every query when
/// `plan_error` is set; `run` fails when `run_error` is set.
pub(crate) struct FakeStore {
    pub plan_error: Option<String>,
    pub run_error: Option<String>,
    plan_checks: AtomicUsize,
    runs: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            plan_error: None,
            run_error: None,
            plan_checks: AtomicUsize::new(0),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn failing_runs(message: &str) -> Self {
        Self {
            run_error: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn timing_out_plans() -> Self {
        Self {
            plan_error: Some("Plan check timed out after 1 seconds".to_string()),
            ..Self::new()
        }
    }

    pub fn plan_checks(&self) -> usize {
        self.plan_checks.load(Ordering::SeqCst)
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryStore for FakeStore {
    async fn plan_check(&self, sql: &str) -> Result<()> {
        self.plan_checks.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.plan_error {
            return Err(AppError::DatabaseError(message.clone()));
        }
        if sql.contains("nonexistent") {
            return Err(AppError::DatabaseError(
                "no such table: nonexistent_table".to_string(),
            ));
        }
        Ok(())
    }

    async fn run(&self, _sql: &str) -> Result<QueryResult> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        match &self.run_error {
            Some(message) => Err(AppError::DatabaseError(message.clone())),
            None => Ok(QueryResult::new(
                vec!["n".to_string()],
                vec![vec![serde_json::json!(1)]],
            )),
        }
    }
}

/// Replays scripted responses in order and keeps every prompt it was given.
pub(crate) struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(responses: &[&str]) -> Self {
        Self::new(responses.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
