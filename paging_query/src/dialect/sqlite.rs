use super::{check_page_size, DatabaseType, JumpWindow, PagingDialect};
use crate::errors::PagingError;
use crate::generated::{GeneratedQuery, PlaceholderStyle};
use crate::query_spec::QuerySpec;
use crate::sql_generation::SqlAssembler;

/// SQLite accepts the MySQL `LIMIT offset, count` form
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl PagingDialect for SqliteDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    fn assembler(&self) -> SqlAssembler {
        SqlAssembler::new(PlaceholderStyle::Question)
    }

    fn first_page_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let limit = format!("LIMIT {}", check_page_size(page_size)?);
        Ok(self.assembler().build_limit_sql(spec, false, &limit))
    }

    fn remaining_pages_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let limit = format!("LIMIT {}", check_page_size(page_size)?);
        if spec.has_group_by() {
            Ok(self.assembler().build_grouped_limit_sql(spec, true, &limit))
        } else {
            Ok(self.assembler().build_limit_sql(spec, true, &limit))
        }
    }

    fn jump_to_item_query(
        &self,
        spec: &QuerySpec,
        item_index: i64,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let window = JumpWindow::new(item_index, page_size)?;
        Ok(self
            .assembler()
            .build_jump_to_sql(spec, &format!("LIMIT {}, 1", window.offset)))
    }
}
