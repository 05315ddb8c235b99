pub mod seed;
pub mod sqlite;

use crate::domain::error::Result;
use crate::domain::query::QueryResult;
use async_trait::async_trait;

/// Read access to the database the generated queries run against.
///
/// Implementations acquire a connection per call and release it before returning,
/// on the error path as well.
#[async_trait]
pub trait QueryStore {
    /// Parse and plan `sql` without running it.
    async fn plan_check(&self, sql: &str) -> Result<()>;
    /// Run `sql` and return every row it produces.
    async fn run(&self, sql: &str) -> Result<QueryResult>;
}
