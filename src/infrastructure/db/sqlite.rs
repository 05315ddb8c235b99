use super::QueryStore;
use crate::domain::error::{AppError, Result};
use crate::domain::query::QueryResult;
use crate::domain::schema::{SchemaDescriptor, TableSchema};
use crate::domain::sql_text::is_single_statement;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row, Statement};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// VM instructions between deadline checks.
const PROGRESS_CHECK_OPS: i32 = 1_000;

/// SQLite-backed [`QueryStore`]. Every call opens its own read-only connection.
///
/// With a query timeout set, each call gets a deadline and SQLite interrupts the
/// running statement once it passes, so the connection is free to close right away.
pub struct SqliteStore {
    options: SqliteConnectOptions,
    query_timeout: Option<Duration>,
}

impl SqliteStore {
    pub fn new(database_url: &str, query_timeout_secs: Option<u64>) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to parse connection string: {}", e))
            })?
            .read_only(true);

        Ok(Self {
            options,
            query_timeout: query_timeout_secs.map(Duration::from_secs),
        })
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        self.options
            .connect()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))
    }

    /// Install the deadline for this call on `conn`.
    async fn arm_deadline(&self, conn: &mut SqliteConnection) -> Result<Option<Instant>> {
        let Some(limit) = self.query_timeout else {
            return Ok(None);
        };
        let deadline = Instant::now() + limit;

        let mut handle = conn
            .lock_handle()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to lock connection: {}", e)))?;
        handle.set_progress_handler(PROGRESS_CHECK_OPS, move || Instant::now() < deadline);

        Ok(Some(deadline))
    }

    fn failure(&self, what: &str, deadline: Option<Instant>, err: sqlx::Error) -> AppError {
        match (deadline, self.query_timeout) {
            (Some(deadline), Some(limit)) if Instant::now() >= deadline => AppError::DatabaseError(
                format!("{} timed out after {} seconds", what, limit.as_secs()),
            ),
            _ => AppError::DatabaseError(err.to_string()),
        }
    }

    /// Read table and column names from the live database, in creation order.
    pub async fn describe_schema(&self) -> Result<SchemaDescriptor> {
        let mut conn = self.connect().await?;
        let outcome = read_schema(&mut conn).await;
        release(conn).await;
        outcome
    }

    async fn explain(&self, conn: &mut SqliteConnection, sql: &str) -> Result<()> {
        let deadline = self.arm_deadline(conn).await?;
        let explain = format!("EXPLAIN QUERY PLAN {}", sql);
        sqlx::query(&explain)
            .fetch_all(&mut *conn)
            .await
            .map(|_| ())
            .map_err(|e| self.failure("Plan check", deadline, e))
    }

    async fn fetch(&self, conn: &mut SqliteConnection, sql: &str) -> Result<QueryResult> {
        let deadline = self.arm_deadline(conn).await?;

        let statement = (&mut *conn)
            .prepare(sql)
            .await
            .map_err(|e| self.failure("Query preparation", deadline, e))?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = sqlx::query(sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| self.failure("Query", deadline, e))?;

        let rows = rows
            .iter()
            .map(|row| (0..row.columns().len()).map(|i| extract_column_value(row, i)).collect())
            .collect();

        Ok(QueryResult::new(columns, rows))
    }
}

#[async_trait]
impl QueryStore for SqliteStore {
    async fn plan_check(&self, sql: &str) -> Result<()> {
        ensure_single_statement(sql)?;
        let mut conn = self.connect().await?;
        let outcome = self.explain(&mut conn, sql).await;
        release(conn).await;

        outcome.map_err(|e| {
            debug!("Plan check rejected query: {}", e);
            e
        })
    }

    async fn run(&self, sql: &str) -> Result<QueryResult> {
        ensure_single_statement(sql)?;
        let mut conn = self.connect().await?;
        let outcome = self.fetch(&mut conn, sql).await;
        release(conn).await;
        outcome
    }
}

/// Multi-statement text would plan only its first statement and run the rest.
fn ensure_single_statement(sql: &str) -> Result<()> {
    if is_single_statement(sql) {
        Ok(())
    } else {
        Err(AppError::DatabaseError(
            "only a single SQL statement is allowed".to_string(),
        ))
    }
}

async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close SQLite connection cleanly: {}", e);
    }
}

#[derive(sqlx::FromRow)]
struct NameEntity {
    name: String,
}

async fn read_schema(conn: &mut SqliteConnection) -> Result<SchemaDescriptor> {
    let tables = sqlx::query_as::<_, NameEntity>(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY rowid",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to list tables: {}", e)))?;

    let mut descriptor = Vec::with_capacity(tables.len());
    for table in tables {
        let columns = sqlx::query_as::<_, NameEntity>(
            "SELECT name FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind(&table.name)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!(
                "Failed to list columns for '{}': {}",
                table.name, e
            ))
        })?;

        descriptor.push(TableSchema {
            name: table.name,
            columns: columns.into_iter().map(|c| c.name).collect(),
        });
    }

    Ok(SchemaDescriptor::new(descriptor))
}

/// Extract a column value from a row as serde_json::Value, following the
/// value's runtime storage class.
fn extract_column_value(row: &SqliteRow, index: usize) -> serde_json::Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v
            .map(|n| serde_json::Value::Number(n.into()))
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return v
            .map(|bytes| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(serde_json::Value::Null);
    }

    serde_json::Value::Null
}
