//! Convenience re-exports for common task-store usage

// Execution
pub use crate::executor::{QueryExecutor, Row, SqlxExecutor};
pub use crate::reader::PagingReader;

// Repositories
pub use crate::task_definitions::{TaskDefinition, TaskDefinitionRepository};
pub use crate::task_executions::{TaskExecution, TaskExecutionRepository, TaskExecutionsInfo};

// Resources
pub use crate::resources::{TaskDefinitionAssembler, TaskDefinitionResource, TaskStatus};
pub use crate::sanitizer::ArgumentSanitizer;

// Error types
pub use crate::errors::StoreError;

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
