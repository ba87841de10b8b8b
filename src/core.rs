//! Core PageHaus functionality
//!
//! This module contains the main PageHaus struct: it owns the connection
//! pool, picks the paging dialect once from configuration and hands out
//! repositories and paging readers that share both.

use paging_query::{
    DatabaseType, PageDefaults, PageRequest, PagedModel, PagingQueryProvider,
    PagingQueryProviderFactory, QuerySpec,
};
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use task_store::{
    PagingReader, QueryExecutor, SqlxExecutor, TASK_DEFINITION_RELATION, TASK_EXECUTION_RELATION,
    TaskDefinitionAssembler, TaskDefinitionRepository, TaskDefinitionResource, TaskExecution,
    TaskExecutionRepository, TaskExecutionsInfo,
};

use crate::errors::PageHausError;
use config::{AppConfig, DatabaseConfig, PagingConfig};

/// Main PageHaus coordinator that manages the database connection and paging dialect
#[derive(Clone)]
pub struct PageHaus {
    pool: AnyPool,
    executor: Arc<SqlxExecutor>,
    providers: PagingQueryProviderFactory,
    page_defaults: PageDefaults,
}

impl PageHaus {
    /// Create new PageHaus with database connection
    pub async fn new(config: DatabaseConfig) -> Result<Self, PageHausError> {
        sqlx::any::install_default_drivers();

        let database: DatabaseType = config.dialect.parse()?;
        let connection_string = config.connection_string()?;

        // Zero max lifetime keeps connections forever; in-memory SQLite depends on it
        let max_lifetime = (config.max_lifetime_seconds > 0)
            .then(|| Duration::from_secs(config.max_lifetime_seconds));

        let pool_options = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .max_lifetime(max_lifetime);

        let pool = pool_options.connect(&connection_string).await?;
        crate::debug_log!("Connected to {} database {}", database, config.database);

        Ok(Self::from_pool(pool, database))
    }

    /// Create PageHaus from a complete application configuration
    pub async fn from_config(config: &AppConfig) -> Result<Self, PageHausError> {
        let pagehaus = Self::new(config.database.clone()).await?;
        Ok(pagehaus.with_paging_config(config.paging))
    }

    /// Wrap an existing pool; `database` selects the paging dialect
    pub fn from_pool(pool: AnyPool, database: DatabaseType) -> Self {
        Self {
            executor: Arc::new(SqlxExecutor::new(pool.clone())),
            pool,
            providers: PagingQueryProviderFactory::new(database),
            page_defaults: PageDefaults::default(),
        }
    }

    pub fn with_paging_config(mut self, paging: PagingConfig) -> Self {
        self.page_defaults = PageDefaults {
            default_size: paging.default_page_size,
            max_size: paging.max_page_size,
        };
        self
    }

    /// Get database pool reference
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn database_type(&self) -> DatabaseType {
        self.providers.database_type()
    }

    pub fn executor(&self) -> Arc<dyn QueryExecutor> {
        self.executor.clone()
    }

    pub fn providers(&self) -> &PagingQueryProviderFactory {
        &self.providers
    }

    pub fn page_defaults(&self) -> PageDefaults {
        self.page_defaults
    }

    /// Paging query provider for `spec` in the configured dialect
    pub fn provider(&self, spec: QuerySpec) -> PagingQueryProvider {
        self.providers.provider(spec)
    }

    /// Paging reader for `spec` over this pool
    pub fn reader(&self, spec: QuerySpec) -> PagingReader {
        PagingReader::new(self.executor(), self.provider(spec))
    }

    /// Parse `page`, `size` and `sort` request parameters with the configured defaults
    pub fn page_request(
        &self,
        page: Option<&str>,
        size: Option<&str>,
        sort: &[&str],
    ) -> Result<PageRequest, PageHausError> {
        Ok(PageRequest::from_params(page, size, sort, self.page_defaults)?)
    }

    pub fn task_definitions(&self) -> TaskDefinitionRepository {
        TaskDefinitionRepository::new(self.executor(), self.providers.clone())
    }

    pub fn task_executions(&self) -> TaskExecutionRepository {
        TaskExecutionRepository::new(self.executor(), self.providers.clone())
    }

    /// Page of task definition resources in HAL form.
    /// `collection_href` is the list URL without paging parameters.
    pub async fn list_task_definitions(
        &self,
        request: &PageRequest,
        task_name: Option<&str>,
        collection_href: &str,
    ) -> Result<PagedModel<TaskDefinitionResource>, PageHausError> {
        crate::trace_log!("Listing task definitions: {:?} name={:?}", request, task_name);

        let page = self.task_definitions().find_all(request, task_name).await?;
        let assembler = TaskDefinitionAssembler::new(self.task_definitions(), self.task_executions());
        let resources = assembler.to_resources(page, resource_base(collection_href)).await?;

        Ok(PagedModel::new(resources, TASK_DEFINITION_RELATION, collection_href))
    }

    /// Page of task executions in HAL form
    pub async fn list_task_executions(
        &self,
        request: &PageRequest,
        task_name: Option<&str>,
        collection_href: &str,
    ) -> Result<PagedModel<TaskExecution>, PageHausError> {
        crate::trace_log!("Listing task executions: {:?} name={:?}", request, task_name);

        let page = self.task_executions().find_all(request, task_name).await?;
        Ok(PagedModel::new(page, TASK_EXECUTION_RELATION, collection_href))
    }

    pub async fn executions_info(
        &self,
        completed: Option<bool>,
        task_name: Option<&str>,
    ) -> Result<TaskExecutionsInfo, PageHausError> {
        Ok(self.task_executions().executions_info(completed, task_name).await?)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), PageHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

/// Collection URL without its query string, for per-item links
fn resource_base(collection_href: &str) -> &str {
    collection_href
        .split_once('?')
        .map_or(collection_href, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_base_strips_query() {
        assert_eq!(
            resource_base("http://localhost:9393/tasks/definitions?taskName=etl"),
            "http://localhost:9393/tasks/definitions"
        );
        assert_eq!(resource_base("/tasks/definitions"), "/tasks/definitions");
    }
}
