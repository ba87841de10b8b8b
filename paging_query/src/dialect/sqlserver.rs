use super::{check_page_size, DatabaseType, JumpWindow, PagingDialect};
use crate::errors::PagingError;
use crate::generated::{GeneratedQuery, PlaceholderStyle};
use crate::query_spec::QuerySpec;
use crate::sql_generation::SqlAssembler;

/// SQL Server paging: `SELECT TOP n` pages, `ROW_NUMBER()` jumps
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl PagingDialect for SqlServerDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::SqlServer
    }

    fn assembler(&self) -> SqlAssembler {
        SqlAssembler::new(PlaceholderStyle::Question)
    }

    fn first_page_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let top = format!("TOP {}", check_page_size(page_size)?);
        Ok(self.assembler().build_top_sql(spec, false, &top))
    }

    fn remaining_pages_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let top = format!("TOP {}", check_page_size(page_size)?);
        if spec.has_group_by() {
            Ok(self.assembler().build_grouped_top_sql(spec, true, &top))
        } else {
            Ok(self.assembler().build_top_sql(spec, true, &top))
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
            .build_row_number_jump_sql(spec, window.row_number()))
    }
}
