//! Task execution storage
//!
//! Executions live in `TASK_EXECUTION`; their command-line arguments in
//! `TASK_EXECUTION_PARAMS`. Arguments are stored as given and sanitized
//! whenever an execution is read back.

use chrono::{DateTime, Utc};
use paging_query::{
    Page, PageRequest, PagingQueryProviderFactory, PlaceholderStyle, QueryFilter, QuerySpec, SortKey,
    SortOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::columns::{format_timestamp, optional_i64, optional_string, optional_timestamp, required_i64, required_string};
use crate::errors::StoreError;
use crate::executor::{QueryExecutor, Row};
use crate::reader::PagingReader;
use crate::sanitizer::ArgumentSanitizer;
use crate::sorting::{sort_keys, NULL_TEXT};

pub const TASK_EXECUTION_TABLE: &str = "TASK_EXECUTION";
pub const TASK_EXECUTION_PARAMS_TABLE: &str = "TASK_EXECUTION_PARAMS";

const COLUMNS: &[&str] = &[
    "TASK_EXECUTION_ID",
    "TASK_NAME",
    "START_TIME",
    "END_TIME",
    "EXIT_CODE",
    "EXIT_MESSAGE",
    "ERROR_MESSAGE",
    "LAST_UPDATED",
    "EXTERNAL_EXECUTION_ID",
    "PARENT_EXECUTION_ID",
];

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("executionId", "TASK_EXECUTION_ID"),
    ("taskExecutionId", "TASK_EXECUTION_ID"),
    ("taskName", "TASK_NAME"),
    ("startTime", "START_TIME"),
    ("endTime", "END_TIME"),
    ("exitCode", "EXIT_CODE"),
];

const NULLABLE_COLUMNS: &[(&str, &str)] = &[
    ("START_TIME", NULL_TEXT),
    ("END_TIME", NULL_TEXT),
    ("EXIT_CODE", "-2147483649"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExecution {
    pub execution_id: i64,
    pub task_name: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub exit_code: Option<i32>,
    pub exit_message: Option<String>,
    pub error_message: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub external_execution_id: Option<String>,
    pub parent_execution_id: Option<i64>,
    pub arguments: Vec<String>,
}

impl TaskExecution {
    pub fn is_complete(&self) -> bool {
        self.end_time.is_some()
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        let exit_code = optional_i64(row, "EXIT_CODE")?
            .map(|code| {
                i32::try_from(code).map_err(|_| {
                    StoreError::SerializationError(format!("exit code out of range: {}", code))
                })
            })
            .transpose()?;

        Ok(Self {
            execution_id: required_i64(row, "TASK_EXECUTION_ID")?,
            task_name: required_string(row, "TASK_NAME")?,
            start_time: optional_timestamp(row, "START_TIME")?,
            end_time: optional_timestamp(row, "END_TIME")?,
            exit_code,
            exit_message: optional_string(row, "EXIT_MESSAGE"),
            error_message: optional_string(row, "ERROR_MESSAGE"),
            last_updated: optional_timestamp(row, "LAST_UPDATED")?,
            external_execution_id: optional_string(row, "EXTERNAL_EXECUTION_ID"),
            parent_execution_id: optional_i64(row, "PARENT_EXECUTION_ID")?,
            arguments: Vec::new(),
        })
    }
}

/// Execution totals as reported by the executions info endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExecutionsInfo {
    pub total_executions: i64,
}

#[derive(Clone)]
pub struct TaskExecutionRepository {
    executor: Arc<dyn QueryExecutor>,
    providers: PagingQueryProviderFactory,
    sanitizer: ArgumentSanitizer,
}

impl TaskExecutionRepository {
    pub fn new(executor: Arc<dyn QueryExecutor>, providers: PagingQueryProviderFactory) -> Self {
        Self {
            executor,
            providers,
            sanitizer: ArgumentSanitizer::new(),
        }
    }

    fn style(&self) -> PlaceholderStyle {
        self.providers.placeholder_style()
    }

    /// Record a started execution of `task_name` with its arguments
    pub async fn create(
        &self,
        task_name: &str,
        arguments: &[String],
        parent_execution_id: Option<i64>,
    ) -> Result<TaskExecution, StoreError> {
        if task_name.trim().is_empty() {
            return Err(StoreError::ValidationError(
                "Task name cannot be empty".to_string(),
            ));
        }

        let next_id_sql = format!(
            "SELECT COALESCE(MAX(TASK_EXECUTION_ID), 0) + 1 FROM {}",
            TASK_EXECUTION_TABLE
        );
        let execution_id = self
            .executor
            .fetch_count(&next_id_sql, &[])
            .await
            .map_err(|e| e.in_operation(TASK_EXECUTION_TABLE, "create"))?;

        let now = Utc::now();
        let insert = format!(
            "INSERT INTO {} (TASK_EXECUTION_ID, TASK_NAME, START_TIME, LAST_UPDATED, PARENT_EXECUTION_ID) VALUES ({})",
            TASK_EXECUTION_TABLE,
            self.style().placeholder_list(1, 5)
        );
        self.executor
            .execute(
                &insert,
                &[
                    json!(execution_id),
                    json!(task_name),
                    json!(format_timestamp(&now)),
                    json!(format_timestamp(&now)),
                    parent_execution_id.map_or(Value::Null, |id| json!(id)),
                ],
            )
            .await
            .map_err(|e| e.in_operation(TASK_EXECUTION_TABLE, "create"))?;

        let insert_param = format!(
            "INSERT INTO {} (TASK_EXECUTION_ID, TASK_PARAM) VALUES ({})",
            TASK_EXECUTION_PARAMS_TABLE,
            self.style().placeholder_list(1, 2)
        );
        for argument in arguments {
            self.executor
                .execute(&insert_param, &[json!(execution_id), json!(argument)])
                .await
                .map_err(|e| e.in_operation(TASK_EXECUTION_PARAMS_TABLE, "create"))?;
        }

        tracing::debug!(execution_id, task_name, "created task execution");

        // Re-read so the returned timestamps carry the stored precision
        self.find_by_id(execution_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("task execution {}", execution_id)))
    }

    /// Mark an execution finished with its exit code
    pub async fn complete(
        &self,
        execution_id: i64,
        exit_code: i32,
        exit_message: Option<&str>,
        error_message: Option<&str>,
    ) -> Result<TaskExecution, StoreError> {
        let execution = self
            .find_by_id(execution_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("task execution {}", execution_id)))?;
        if execution.is_complete() {
            return Err(StoreError::ValidationError(format!(
                "Task execution {} is already complete",
                execution_id
            )));
        }

        let style = self.style();
        let now = format_timestamp(&Utc::now());
        let sql = format!(
            "UPDATE {} SET END_TIME = {}, EXIT_CODE = {}, EXIT_MESSAGE = {}, ERROR_MESSAGE = {}, LAST_UPDATED = {} WHERE TASK_EXECUTION_ID = {}",
            TASK_EXECUTION_TABLE,
            style.placeholder(1),
            style.placeholder(2),
            style.placeholder(3),
            style.placeholder(4),
            style.placeholder(5),
            style.placeholder(6)
        );
        self.executor
            .execute(
                &sql,
                &[
                    json!(now),
                    json!(exit_code),
                    exit_message.map_or(Value::Null, |m| json!(m)),
                    error_message.map_or(Value::Null, |m| json!(m)),
                    json!(now),
                    json!(execution_id),
                ],
            )
            .await
            .map_err(|e| e.in_operation(TASK_EXECUTION_TABLE, "complete"))?;

        tracing::debug!(execution_id, exit_code, "completed task execution");

        self.find_by_id(execution_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("task execution {}", execution_id)))
    }

    pub async fn find_by_id(&self, execution_id: i64) -> Result<Option<TaskExecution>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE TASK_EXECUTION_ID = {}",
            COLUMNS.join(", "),
            TASK_EXECUTION_TABLE,
            self.style().placeholder(1)
        );
        let row = self
            .executor
            .fetch_optional(&sql, &[json!(execution_id)])
            .await
            .map_err(|e| e.in_operation(TASK_EXECUTION_TABLE, "find_by_id"))?;

        match row {
            Some(row) => Ok(self.with_arguments(vec![TaskExecution::from_row(&row)?]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Most recently started execution of `task_name`
    pub async fn latest_for_task(&self, task_name: &str) -> Result<Option<TaskExecution>, StoreError> {
        let spec = QuerySpec::builder(TASK_EXECUTION_TABLE)
            .columns(COLUMNS)
            .filter(QueryFilter::eq("TASK_NAME", json!(task_name)))
            .order_by("START_TIME", SortOrder::Desc)
            .order_by("TASK_EXECUTION_ID", SortOrder::Desc)
            .build()?;

        let query = self.providers.provider(spec).generate_first_page_query(1)?;
        let row = self
            .executor
            .fetch_optional(query.sql(), &query.values()?)
            .await
            .map_err(|e| e.in_operation(TASK_EXECUTION_TABLE, "latest_for_task"))?;

        match row {
            Some(row) => Ok(self.with_arguments(vec![TaskExecution::from_row(&row)?]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Count executions: `Some(true)` only completed ones, `Some(false)` only
    /// running ones, `None` all of them
    pub async fn executions_info(
        &self,
        completed: Option<bool>,
        task_name: Option<&str>,
    ) -> Result<TaskExecutionsInfo, StoreError> {
        let spec = self.filtered_spec(completed, task_name, vec![SortKey::asc("TASK_EXECUTION_ID")])?;
        let total_executions = PagingReader::new(self.executor.clone(), self.providers.provider(spec))
            .count()
            .await
            .map_err(|e| e.in_operation(TASK_EXECUTION_TABLE, "executions_info"))?;

        Ok(TaskExecutionsInfo { total_executions })
    }

    /// One page of executions, newest first unless the request sorts otherwise
    pub async fn find_all(
        &self,
        request: &PageRequest,
        task_name: Option<&str>,
    ) -> Result<Page<TaskExecution>, StoreError> {
        let keys = sort_keys(
            request,
            SORT_COLUMNS,
            NULLABLE_COLUMNS,
            SortKey::desc("TASK_EXECUTION_ID"),
            SortKey::desc("TASK_EXECUTION_ID"),
        )?;
        let spec = self.filtered_spec(None, task_name, keys)?;

        let page = PagingReader::new(self.executor.clone(), self.providers.provider(spec))
            .read_page(request)
            .await
            .map_err(|e| e.in_operation(TASK_EXECUTION_TABLE, "find_all"))?;

        let executions = page
            .content()
            .iter()
            .map(TaskExecution::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        let executions = self.with_arguments(executions).await?;

        Ok(Page::new(executions, request, page.total_elements()))
    }

    fn filtered_spec(
        &self,
        completed: Option<bool>,
        task_name: Option<&str>,
        keys: Vec<SortKey>,
    ) -> Result<QuerySpec, StoreError> {
        let mut builder = QuerySpec::builder(TASK_EXECUTION_TABLE)
            .columns(COLUMNS)
            .sort_keys(keys);

        match completed {
            Some(true) => builder = builder.filter(QueryFilter::is_not_null("END_TIME")),
            Some(false) => builder = builder.filter(QueryFilter::is_null("END_TIME")),
            None => {}
        }
        if let Some(name) = task_name {
            builder = builder.filter(QueryFilter::eq("TASK_NAME", json!(name)));
        }

        Ok(builder.build()?)
    }

    /// Load and sanitize the arguments of `executions` in one query
    async fn with_arguments(
        &self,
        mut executions: Vec<TaskExecution>,
    ) -> Result<Vec<TaskExecution>, StoreError> {
        if executions.is_empty() {
            return Ok(executions);
        }

        let ids: Vec<Value> = executions.iter().map(|e| json!(e.execution_id)).collect();
        let sql = format!(
            "SELECT TASK_EXECUTION_ID, TASK_PARAM FROM {} WHERE TASK_EXECUTION_ID IN ({})",
            TASK_EXECUTION_PARAMS_TABLE,
            self.style().placeholder_list(1, ids.len())
        );
        let rows = self
            .executor
            .fetch_all(&sql, &ids)
            .await
            .map_err(|e| e.in_operation(TASK_EXECUTION_PARAMS_TABLE, "find_arguments"))?;

        let mut arguments: HashMap<i64, Vec<String>> = HashMap::new();
        for row in &rows {
            let id = required_i64(row, "TASK_EXECUTION_ID")?;
            if let Some(param) = optional_string(row, "TASK_PARAM") {
                arguments.entry(id).or_default().push(param);
            }
        }

        for execution in &mut executions {
            if let Some(raw) = arguments.remove(&execution.execution_id) {
                execution.arguments = self.sanitizer.sanitize_arguments(&raw);
            }
        }
        Ok(executions)
    }
}
