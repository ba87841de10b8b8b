//! Scripted executor for unit tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::errors::StoreError;
use crate::executor::{QueryExecutor, Row};

/// Replays queued results in order and records every statement it is given
#[derive(Debug, Default)]
pub(crate) struct ScriptedExecutor {
    results: Mutex<VecDeque<Vec<Row>>>,
    affected: Mutex<VecDeque<u64>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_rows(&self, rows: Vec<Row>) {
        self.results.lock().unwrap().push_back(rows);
    }

    pub(crate) fn push_count(&self, count: i64) {
        let mut row = Row::new();
        row.insert("COUNT(*)".to_string(), json!(count));
        self.push_rows(vec![row]);
    }

    pub(crate) fn push_affected(&self, rows: u64) {
        self.affected.lock().unwrap().push_back(rows);
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, params: &[Value]) {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        self.record(sql, params);
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        self.record(sql, params);
        Ok(self.affected.lock().unwrap().pop_front().unwrap_or(1))
    }
}
