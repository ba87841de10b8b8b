//! Paging query provider
//!
//! A [`PagingQueryProvider`] binds one query specification to the dialect
//! selected for the configured database. Providers are cheap to clone and
//! can be shared across tasks.

use std::sync::Arc;
use tracing::trace;

use crate::dialect::{dialect_for, DatabaseType, PagingDialect};
use crate::errors::PagingError;
use crate::generated::{GeneratedQuery, PlaceholderStyle};
use crate::query_spec::QuerySpec;

#[derive(Debug, Clone)]
pub struct PagingQueryProvider {
    spec: Arc<QuerySpec>,
    dialect: Arc<dyn PagingDialect>,
}

impl PagingQueryProvider {
    pub fn new(spec: QuerySpec, dialect: Arc<dyn PagingDialect>) -> Self {
        Self {
            spec: Arc::new(spec),
            dialect,
        }
    }

    pub fn for_database(spec: QuerySpec, database: DatabaseType) -> Self {
        Self::new(spec, dialect_for(database))
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn database_type(&self) -> DatabaseType {
        self.dialect.database_type()
    }

    pub fn generate_first_page_query(&self, page_size: i64) -> Result<GeneratedQuery, PagingError> {
        let query = self.dialect.first_page_query(&self.spec, page_size)?;
        trace!(database = %self.database_type(), sql = %query, "first page query");
        Ok(query)
    }

    pub fn generate_remaining_pages_query(
        &self,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let query = self.dialect.remaining_pages_query(&self.spec, page_size)?;
        trace!(database = %self.database_type(), sql = %query, "remaining pages query");
        Ok(query)
    }

    pub fn generate_jump_to_item_query(
        &self,
        item_index: i64,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let query = self
            .dialect
            .jump_to_item_query(&self.spec, item_index, page_size)?;
        trace!(
            database = %self.database_type(),
            item_index,
            page_size,
            sql = %query,
            "jump to item query"
        );
        Ok(query)
    }

    pub fn generate_count_query(&self) -> GeneratedQuery {
        self.dialect.count_query(&self.spec)
    }
}

/// Creates providers that all share the dialect chosen at configuration time
#[derive(Debug, Clone)]
pub struct PagingQueryProviderFactory {
    dialect: Arc<dyn PagingDialect>,
}

impl PagingQueryProviderFactory {
    pub fn new(database: DatabaseType) -> Self {
        Self {
            dialect: dialect_for(database),
        }
    }

    pub fn with_dialect(dialect: Arc<dyn PagingDialect>) -> Self {
        Self { dialect }
    }

    /// Resolve the dialect from a configured name such as `"mariadb"`
    pub fn from_name(name: &str) -> Result<Self, PagingError> {
        Ok(Self::new(name.parse()?))
    }

    pub fn database_type(&self) -> DatabaseType {
        self.dialect.database_type()
    }

    /// Placeholder style for statements written outside the paging queries
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.dialect.assembler().placeholder_style()
    }

    pub fn dialect(&self) -> Arc<dyn PagingDialect> {
        Arc::clone(&self.dialect)
    }

    pub fn provider(&self, spec: QuerySpec) -> PagingQueryProvider {
        PagingQueryProvider::new(spec, self.dialect())
    }
}
