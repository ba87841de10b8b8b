//! Task Store - paged persistence for task definitions and executions
//!
//! This crate executes the SQL produced by `paging-query`: a keyset
//! [`PagingReader`] over any [`QueryExecutor`], a sqlx-backed executor, and
//! the task definition and task execution repositories built on them.

mod columns;
mod sorting;
#[cfg(test)]
mod testing;

pub mod errors;
pub mod executor;
pub mod prelude;
pub mod reader;
pub mod resources;
pub mod sanitizer;
pub mod task_definitions;
pub mod task_executions;

pub use errors::StoreError;
pub use executor::{QueryExecutor, Row, SqlxExecutor};
pub use reader::PagingReader;
pub use resources::{
    TaskDefinitionAssembler, TaskDefinitionResource, TaskStatus, TASK_DEFINITION_RELATION,
    TASK_EXECUTION_RELATION,
};
pub use sanitizer::ArgumentSanitizer;
pub use task_definitions::{TaskDefinition, TaskDefinitionRepository, TASK_DEFINITIONS_TABLE};
pub use task_executions::{
    TaskExecution, TaskExecutionRepository, TaskExecutionsInfo, TASK_EXECUTION_PARAMS_TABLE,
    TASK_EXECUTION_TABLE,
};
