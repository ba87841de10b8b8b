//! Query execution seam
//!
//! Repositories and the paging reader only talk to a [`QueryExecutor`]:
//! SQL text plus positional JSON parameters in, rows as ordered JSON maps
//! out. [`SqlxExecutor`] runs them on a `sqlx::AnyPool`.

use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Column, Row as _};

use crate::errors::StoreError;

/// A result row keyed by upper-cased column name, in select order
pub type Row = Map<String, Value>;

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError>;

    /// Run a statement and return the number of affected rows
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError>;

    async fn fetch_optional(&self, sql: &str, params: &[Value]) -> Result<Option<Row>, StoreError> {
        Ok(self.fetch_all(sql, params).await?.into_iter().next())
    }

    /// First column of the first row as an integer, e.g. a `COUNT(*)`
    async fn fetch_count(&self, sql: &str, params: &[Value]) -> Result<i64, StoreError> {
        let row = self
            .fetch_optional(sql, params)
            .await?
            .ok_or_else(|| StoreError::DatabaseError(format!("count query returned no rows: {}", sql)))?;

        match row.values().next() {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| StoreError::SerializationError(format!("count is not an integer: {}", n))),
            Some(Value::String(s)) => s
                .parse()
                .map_err(|_| StoreError::SerializationError(format!("count is not an integer: {}", s))),
            other => Err(StoreError::SerializationError(format!(
                "unexpected count value: {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlxExecutor {
    pool: AnyPool,
}

impl SqlxExecutor {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    fn build_query<'q>(sql: &'q str, params: &[Value]) -> Query<'q, Any, AnyArguments<'q>> {
        params
            .iter()
            .fold(sqlx::query(sql), |query, param| bind_value(query, param))
    }
}

fn bind_value<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: &Value,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.to_string()),
    }
}

/// Decode by trying the types the Any driver can carry, most specific first
fn decode_column(row: &AnyRow, index: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
        return value.map(Value::Bool).unwrap_or(Value::Null);
    }
    Value::Null
}

fn to_row(row: &AnyRow) -> Row {
    row.columns()
        .iter()
        .map(|column| {
            (
                column.name().to_ascii_uppercase(),
                decode_column(row, column.ordinal()),
            )
        })
        .collect()
}

#[async_trait]
impl QueryExecutor for SqlxExecutor {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        tracing::trace!(sql, params = params.len(), "fetch_all");
        let rows = Self::build_query(sql, params).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(to_row).collect())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        tracing::trace!(sql, params = params.len(), "execute");
        let result = Self::build_query(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
