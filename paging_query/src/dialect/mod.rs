//! Database paging dialects
//!
//! Each supported database implements [`PagingDialect`]: the three paging
//! queries differ only in how rows are limited and how a single row at an
//! absolute position is selected. Everything else comes from the shared
//! [`SqlAssembler`].

mod database_type;
mod db2;
mod h2;
mod mariadb;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

pub use database_type::DatabaseType;
pub use db2::Db2Dialect;
pub use h2::H2Dialect;
pub use mariadb::MariaDbDialect;
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::PagingError;
use crate::generated::GeneratedQuery;
use crate::query_spec::QuerySpec;
use crate::sql_generation::SqlAssembler;

/// Per-database paging query generation.
///
/// Implementations are stateless; a single instance can serve any number of
/// query specifications from any number of threads.
pub trait PagingDialect: Debug + Send + Sync {
    fn database_type(&self) -> DatabaseType;

    /// Fragment assembler configured for this database's placeholders
    fn assembler(&self) -> SqlAssembler;

    /// Query for the first `page_size` rows in sort order
    fn first_page_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError>;

    /// Query for the next `page_size` rows after a resume row
    fn remaining_pages_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError>;

    /// Query selecting the sort keys of the last row before the page that
    /// contains `item_index` (or the first row when that page is the first)
    fn jump_to_item_query(
        &self,
        spec: &QuerySpec,
        item_index: i64,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError>;

    fn count_query(&self, spec: &QuerySpec) -> GeneratedQuery {
        self.assembler().build_count_sql(spec)
    }
}

/// Position of the row a jump-to-item query selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpWindow {
    /// Zero-based page containing the requested item
    pub page: i64,
    /// Zero-based offset of the selected row: `max(page * size - 1, 0)`
    pub offset: i64,
}

impl JumpWindow {
    pub fn new(item_index: i64, page_size: i64) -> Result<Self, PagingError> {
        check_page_size(page_size)?;
        if item_index < 0 {
            return Err(PagingError::item_index(item_index));
        }

        let page = item_index / page_size;
        // page * page_size <= item_index, so this cannot overflow
        let offset = (page * page_size - 1).max(0);

        Ok(Self { page, offset })
    }

    /// One-based row number of the selected row, for ROWNUM/ROW_NUMBER() dialects
    pub fn row_number(&self) -> i64 {
        self.offset + 1
    }
}

pub(crate) fn check_page_size(page_size: i64) -> Result<i64, PagingError> {
    if page_size <= 0 {
        return Err(PagingError::page_size(page_size));
    }
    Ok(page_size)
}

/// The dialect implementation for a database, chosen once at configuration time
pub fn dialect_for(database: DatabaseType) -> Arc<dyn PagingDialect> {
    match database {
        DatabaseType::MariaDb => Arc::new(MariaDbDialect),
        DatabaseType::MySql => Arc::new(MySqlDialect),
        DatabaseType::Postgres => Arc::new(PostgresDialect),
        DatabaseType::Sqlite => Arc::new(SqliteDialect),
        DatabaseType::H2 => Arc::new(H2Dialect),
        DatabaseType::SqlServer => Arc::new(SqlServerDialect),
        DatabaseType::Db2 => Arc::new(Db2Dialect),
        DatabaseType::Oracle => Arc::new(OracleDialect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_spec::{GroupBy, QueryFilter, SelectField, SortOrder};

    fn spec() -> QuerySpec {
        QuerySpec::builder("T")
            .order_by("id", SortOrder::Asc)
            .build()
            .unwrap()
    }

    fn grouped() -> QuerySpec {
        QuerySpec::builder("T")
            .select(SelectField::field("category"))
            .select(SelectField::count_all().with_alias("total"))
            .group_by(GroupBy::single("category"))
            .order_by("category", SortOrder::Asc)
            .build()
            .unwrap()
    }

    #[test]
    fn test_jump_window_examples() {
        assert_eq!(
            JumpWindow::new(25, 10).unwrap(),
            JumpWindow { page: 2, offset: 19 }
        );
        assert_eq!(JumpWindow::new(5, 10).unwrap(), JumpWindow { page: 0, offset: 0 });
        assert_eq!(JumpWindow::new(0, 10).unwrap(), JumpWindow { page: 0, offset: 0 });
        assert_eq!(JumpWindow::new(10, 10).unwrap(), JumpWindow { page: 1, offset: 9 });
        assert_eq!(JumpWindow::new(10, 10).unwrap().row_number(), 10);
        assert_eq!(JumpWindow::new(3, 10).unwrap().row_number(), 1);
    }

    #[test]
    fn test_jump_window_formula_holds() {
        for item_index in 0..200 {
            for page_size in 1..25 {
                let window = JumpWindow::new(item_index, page_size).unwrap();
                let expected = ((item_index / page_size) * page_size - 1).max(0);
                assert_eq!(window.offset, expected, "{} / {}", item_index, page_size);
            }
        }
    }

    #[test]
    fn test_jump_window_rejects_invalid_arguments() {
        assert!(matches!(
            JumpWindow::new(5, 0),
            Err(PagingError::InvalidArgument(_))
        ));
        assert!(matches!(
            JumpWindow::new(5, -3),
            Err(PagingError::InvalidArgument(_))
        ));
        assert!(matches!(
            JumpWindow::new(-1, 10),
            Err(PagingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_every_dialect_guards_page_size() {
        for database in DatabaseType::ALL {
            let dialect = dialect_for(database);
            assert_eq!(dialect.database_type(), database);

            for bad in [0, -1] {
                assert!(dialect.first_page_query(&spec(), bad).is_err(), "{}", database);
                assert!(dialect.remaining_pages_query(&spec(), bad).is_err(), "{}", database);
                assert!(dialect.jump_to_item_query(&spec(), 5, bad).is_err(), "{}", database);
            }
            assert!(dialect.jump_to_item_query(&spec(), -5, 10).is_err(), "{}", database);
        }
    }

    #[test]
    fn test_every_dialect_is_deterministic() {
        let filtered = QuerySpec::builder("T")
            .filter(QueryFilter::is_not_null("name"))
            .order_by("id", SortOrder::Desc)
            .build()
            .unwrap();

        for database in DatabaseType::ALL {
            let dialect = dialect_for(database);
            for spec in [spec(), grouped(), filtered.clone()] {
                assert_eq!(
                    dialect.first_page_query(&spec, 10).unwrap(),
                    dialect.first_page_query(&spec, 10).unwrap()
                );
                assert_eq!(
                    dialect.remaining_pages_query(&spec, 10).unwrap(),
                    dialect.remaining_pages_query(&spec, 10).unwrap()
                );
                assert_eq!(
                    dialect.jump_to_item_query(&spec, 37, 10).unwrap(),
                    dialect.jump_to_item_query(&spec, 37, 10).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_every_dialect_preserves_sort_order() {
        for database in DatabaseType::ALL {
            let dialect = dialect_for(database);
            let first = dialect.first_page_query(&spec(), 10).unwrap();
            let remaining = dialect.remaining_pages_query(&spec(), 10).unwrap();
            let jump = dialect.jump_to_item_query(&spec(), 30, 10).unwrap();

            for query in [&first, &remaining, &jump] {
                assert!(query.sql().contains("ORDER BY id ASC"), "{}: {}", database, query);
            }
            assert!(!first.needs_resume_row(), "{}", database);
            assert!(remaining.needs_resume_row(), "{}", database);
            assert!(!jump.needs_resume_row(), "{}", database);
        }
    }

    #[test]
    fn test_every_dialect_routes_grouped_remaining_pages() {
        for database in DatabaseType::ALL {
            let dialect = dialect_for(database);
            let plain = dialect.remaining_pages_query(&spec(), 10).unwrap();
            let grouped = dialect.remaining_pages_query(&grouped(), 10).unwrap();

            assert!(!plain.sql().contains("GROUP BY"), "{}", database);
            assert!(grouped.sql().contains("GROUP BY category"), "{}", database);
        }
    }
}
