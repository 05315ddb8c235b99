pub mod candidate_extractor;
pub mod correction_loop;
pub mod loop_events;
pub mod prompt_builder;
pub mod query_executor;
pub mod sql_validator;

#[cfg(test)]
pub(crate) mod test_support;
