use super::{check_page_size, DatabaseType, JumpWindow, PagingDialect};
use crate::errors::PagingError;
use crate::generated::{GeneratedQuery, PlaceholderStyle};
use crate::query_spec::QuerySpec;
use crate::sql_generation::SqlAssembler;

#[derive(Debug, Clone, Copy, Default)]
pub struct Db2Dialect;

impl PagingDialect for Db2Dialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Db2
    }

    fn assembler(&self) -> SqlAssembler {
        SqlAssembler::new(PlaceholderStyle::Question)
    }

    fn first_page_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let fetch = format!("FETCH FIRST {} ROWS ONLY", check_page_size(page_size)?);
        Ok(self.assembler().build_limit_sql(spec, false, &fetch))
    }

    fn remaining_pages_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let fetch = format!("FETCH FIRST {} ROWS ONLY", check_page_size(page_size)?);
        if spec.has_group_by() {
            Ok(self.assembler().build_grouped_limit_sql(spec, true, &fetch))
        } else {
            Ok(self.assembler().build_limit_sql(spec, true, &fetch))
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
