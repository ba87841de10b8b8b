//! Task definition storage
//!
//! Definitions live in `TASK_DEFINITIONS` (name, DSL text, description).
//! Listing is paged through a [`PagingReader`] so every backend gets its own
//! dialect's paging SQL.

use paging_query::{
    Page, PageRequest, PagingQueryProviderFactory, PlaceholderStyle, QueryFilter, QuerySpec, SortKey,
    SortOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::columns::{optional_string, required_string};
use crate::errors::StoreError;
use crate::executor::{QueryExecutor, Row};
use crate::reader::PagingReader;
use crate::sorting::{sort_keys, NULL_TEXT};

pub const TASK_DEFINITIONS_TABLE: &str = "TASK_DEFINITIONS";

const COLUMNS: &[&str] = &["DEFINITION_NAME", "DEFINITION", "DESCRIPTION"];

/// Sort properties accepted by [`TaskDefinitionRepository::find_all`]
const SORT_COLUMNS: &[(&str, &str)] = &[
    ("taskName", "DEFINITION_NAME"),
    ("name", "DEFINITION_NAME"),
    ("dslText", "DEFINITION"),
    ("definition", "DEFINITION"),
    ("description", "DESCRIPTION"),
];

const NULLABLE_COLUMNS: &[(&str, &str)] = &[("DESCRIPTION", NULL_TEXT)];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    pub name: String,
    pub dsl_text: String,
    pub description: Option<String>,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, dsl_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dsl_text: dsl_text.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// A composed definition chains several tasks (`a && b`, `a || b`, `<a || b>`)
    pub fn is_composed(&self) -> bool {
        let dsl = self.dsl_text.trim();
        dsl.contains("&&") || dsl.contains("||") || dsl.starts_with('<')
    }

    /// Name of the composed definition this one was generated for, when the
    /// name has the `<parent>-<label>` shape
    pub fn parent_name(&self) -> Option<&str> {
        self.name
            .rsplit_once('-')
            .map(|(parent, _)| parent)
            .filter(|parent| !parent.is_empty())
    }

    fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::ValidationError(
                "Task definition name cannot be empty".to_string(),
            ));
        }
        if self.dsl_text.trim().is_empty() {
            return Err(StoreError::ValidationError(format!(
                "Task definition '{}' has an empty definition",
                self.name
            )));
        }
        Ok(())
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            name: required_string(row, "DEFINITION_NAME")?,
            dsl_text: required_string(row, "DEFINITION")?,
            description: optional_string(row, "DESCRIPTION"),
        })
    }
}

#[derive(Clone)]
pub struct TaskDefinitionRepository {
    executor: Arc<dyn QueryExecutor>,
    providers: PagingQueryProviderFactory,
}

impl TaskDefinitionRepository {
    pub fn new(executor: Arc<dyn QueryExecutor>, providers: PagingQueryProviderFactory) -> Self {
        Self {
            executor,
            providers,
        }
    }

    fn style(&self) -> PlaceholderStyle {
        self.providers.placeholder_style()
    }

    pub async fn save(&self, definition: TaskDefinition) -> Result<TaskDefinition, StoreError> {
        definition.validate()?;

        if self.find_by_name(&definition.name).await?.is_some() {
            return Err(StoreError::AlreadyExists(format!(
                "task definition '{}'",
                definition.name
            )));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            TASK_DEFINITIONS_TABLE,
            COLUMNS.join(", "),
            self.style().placeholder_list(1, COLUMNS.len())
        );
        let params = [
            json!(definition.name),
            json!(definition.dsl_text),
            definition
                .description
                .as_ref()
                .map_or(Value::Null, |d| json!(d)),
        ];

        self.executor
            .execute(&sql, &params)
            .await
            .map_err(|e| e.in_operation(TASK_DEFINITIONS_TABLE, "save"))?;

        tracing::debug!(name = %definition.name, "saved task definition");
        Ok(definition)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<TaskDefinition>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE DEFINITION_NAME = {}",
            COLUMNS.join(", "),
            TASK_DEFINITIONS_TABLE,
            self.style().placeholder(1)
        );

        let row = self
            .executor
            .fetch_optional(&sql, &[json!(name)])
            .await
            .map_err(|e| e.in_operation(TASK_DEFINITIONS_TABLE, "find_by_name"))?;

        row.as_ref().map(TaskDefinition::from_row).transpose()
    }

    pub async fn delete_by_name(&self, name: &str) -> Result<(), StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE DEFINITION_NAME = {}",
            TASK_DEFINITIONS_TABLE,
            self.style().placeholder(1)
        );

        let deleted = self
            .executor
            .execute(&sql, &[json!(name)])
            .await
            .map_err(|e| e.in_operation(TASK_DEFINITIONS_TABLE, "delete_by_name"))?;

        if deleted == 0 {
            return Err(StoreError::NotFound(format!("task definition '{}'", name)));
        }

        tracing::debug!(name, "deleted task definition");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let spec = QuerySpec::builder(TASK_DEFINITIONS_TABLE)
            .order_by("DEFINITION_NAME", SortOrder::Asc)
            .build()?;

        PagingReader::new(self.executor.clone(), self.providers.provider(spec))
            .count()
            .await
            .map_err(|e| e.in_operation(TASK_DEFINITIONS_TABLE, "count"))
    }

    /// One page of definitions, optionally restricted to names containing `task_name`
    pub async fn find_all(
        &self,
        request: &PageRequest,
        task_name: Option<&str>,
    ) -> Result<Page<TaskDefinition>, StoreError> {
        let keys = sort_keys(
            request,
            SORT_COLUMNS,
            NULLABLE_COLUMNS,
            SortKey::asc("DEFINITION_NAME"),
            SortKey::asc("DEFINITION_NAME"),
        )?;

        let mut builder = QuerySpec::builder(TASK_DEFINITIONS_TABLE)
            .columns(COLUMNS)
            .sort_keys(keys);
        if let Some(fragment) = task_name.filter(|n| !n.is_empty()) {
            builder = builder.filter(QueryFilter::contains("DEFINITION_NAME", fragment));
        }

        let reader = PagingReader::new(self.executor.clone(), self.providers.provider(builder.build()?));
        let page = reader
            .read_page(request)
            .await
            .map_err(|e| e.in_operation(TASK_DEFINITIONS_TABLE, "find_all"))?;

        let definitions = page
            .content()
            .iter()
            .map(TaskDefinition::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(definitions, request, page.total_elements()))
    }
}
