//! Resource views returned by the list endpoints

use paging_query::{Link, Page};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::StoreError;
use crate::task_definitions::{TaskDefinition, TaskDefinitionRepository};
use crate::task_executions::{TaskExecution, TaskExecutionRepository};

/// `_embedded` relation of a page of task definitions
pub const TASK_DEFINITION_RELATION: &str = "taskDefinitionResourceList";
/// `_embedded` relation of a page of task executions
pub const TASK_EXECUTION_RELATION: &str = "taskExecutionResourceList";

/// Status of a definition, derived from its latest execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Unknown,
    Running,
    Complete,
    Error,
}

impl TaskStatus {
    pub fn of(last_execution: Option<&TaskExecution>) -> Self {
        match last_execution {
            None => TaskStatus::Unknown,
            Some(execution) if execution.end_time.is_none() => TaskStatus::Running,
            Some(execution) if execution.exit_code == Some(0) => TaskStatus::Complete,
            Some(_) => TaskStatus::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinitionResource {
    pub name: String,
    pub dsl_text: String,
    pub description: Option<String>,
    pub composed: bool,
    pub last_task_execution: Option<TaskExecution>,
    pub status: TaskStatus,
    pub composed_task_element: bool,
    #[serde(rename = "_links", skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl TaskDefinitionResource {
    pub fn new(
        definition: TaskDefinition,
        last_task_execution: Option<TaskExecution>,
        composed_task_element: bool,
    ) -> Self {
        Self {
            composed: definition.is_composed(),
            status: TaskStatus::of(last_task_execution.as_ref()),
            name: definition.name,
            dsl_text: definition.dsl_text,
            description: definition.description,
            last_task_execution,
            composed_task_element,
            links: BTreeMap::new(),
        }
    }

    /// Add `_links.self` pointing at `<collection_href>/<name>`
    pub fn with_self_link(mut self, collection_href: &str) -> Self {
        let href = format!("{}/{}", collection_href.trim_end_matches('/'), self.name);
        self.links.insert("self".to_string(), Link::new(href));
        self
    }
}

/// Turns stored definitions into resources, looking up each one's latest
/// execution and whether it belongs to a composed definition
#[derive(Clone)]
pub struct TaskDefinitionAssembler {
    definitions: TaskDefinitionRepository,
    executions: TaskExecutionRepository,
}

impl TaskDefinitionAssembler {
    pub fn new(definitions: TaskDefinitionRepository, executions: TaskExecutionRepository) -> Self {
        Self {
            definitions,
            executions,
        }
    }

    pub async fn to_resource(
        &self,
        definition: TaskDefinition,
        collection_href: &str,
    ) -> Result<TaskDefinitionResource, StoreError> {
        let last_execution = self.executions.latest_for_task(&definition.name).await?;

        let composed_task_element = match definition.parent_name() {
            Some(parent) => self
                .definitions
                .find_by_name(parent)
                .await?
                .is_some_and(|parent| parent.is_composed()),
            None => false,
        };

        Ok(TaskDefinitionResource::new(definition, last_execution, composed_task_element)
            .with_self_link(collection_href))
    }

    pub async fn to_resources(
        &self,
        page: Page<TaskDefinition>,
        collection_href: &str,
    ) -> Result<Page<TaskDefinitionResource>, StoreError> {
        let metadata = *page.metadata();
        let mut resources = Vec::with_capacity(page.content().len());
        for definition in page.into_content() {
            resources.push(self.to_resource(definition, collection_href).await?);
        }
        Ok(Page::from_parts(resources, metadata))
    }
}
