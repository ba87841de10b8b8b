//! Convenience re-exports for common paging-query usage

// Query specification
pub use crate::query_spec::{
    AggregateFunction, GroupBy, JoinClause, JoinType, QueryFilter, QueryOperator, QuerySpec,
    SelectField, SortKey, SortOrder,
};

// Dialects and providers
pub use crate::dialect::{dialect_for, DatabaseType, PagingDialect};
pub use crate::provider::{PagingQueryProvider, PagingQueryProviderFactory};

// Generated output
pub use crate::generated::{GeneratedQuery, QueryParameter};

// Pages
pub use crate::page::{Page, PageDefaults, PageMetadata, PageRequest, PagedModel};

// Error types
pub use crate::errors::PagingError;
pub use crate::validation::ValidationError;
