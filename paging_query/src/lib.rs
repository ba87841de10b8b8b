//! Paging Query - dialect-specific paging SQL for PageHaus
//!
//! This crate turns a [`QuerySpec`] into the three queries a keyset paging
//! reader needs (first page, remaining pages, jump to item) for each
//! supported database, plus the page request and page model types used by
//! list endpoints. It performs no I/O.

pub mod dialect;
pub mod errors;
pub mod generated;
pub mod page;
pub mod prelude;
pub mod provider;
pub mod query_spec;
pub mod sql_generation;
pub mod validation;

pub use dialect::{dialect_for, DatabaseType, JumpWindow, PagingDialect};
pub use errors::PagingError;
pub use generated::{GeneratedQuery, PlaceholderStyle, QueryParameter};
pub use page::{Link, Page, PageDefaults, PageMetadata, PageRequest, PagedModel, SortProperty};
pub use provider::{PagingQueryProvider, PagingQueryProviderFactory};
pub use query_spec::{
    GroupBy, JoinClause, JoinType, QueryFilter, QueryOperator, QuerySpec, QuerySpecBuilder,
    SelectField, SortKey, SortOrder,
};
pub use sql_generation::SqlAssembler;
pub use validation::{ValidatedIdentifier, ValidationError};
