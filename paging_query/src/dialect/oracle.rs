use super::{check_page_size, DatabaseType, JumpWindow, PagingDialect};
use crate::errors::PagingError;
use crate::generated::{GeneratedQuery, PlaceholderStyle};
use crate::query_spec::QuerySpec;
use crate::sql_generation::SqlAssembler;

/// Oracle paging through nested `ROWNUM` filters
///
/// The ordered query always runs as an inline view, so grouped and plain
/// specifications share one shape: the resume predicate is applied to the
/// view's output in both cases.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl PagingDialect for OracleDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Oracle
    }

    fn assembler(&self) -> SqlAssembler {
        SqlAssembler::new(PlaceholderStyle::Question).without_derived_table_as()
    }

    fn first_page_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let row_num = format!("ROWNUM <= {}", check_page_size(page_size)?);
        Ok(self.assembler().build_row_num_sql(spec, false, &row_num))
    }

    fn remaining_pages_query(
        &self,
        spec: &QuerySpec,
        page_size: i64,
    ) -> Result<GeneratedQuery, PagingError> {
        let row_num = format!("ROWNUM <= {}", check_page_size(page_size)?);
        Ok(self.assembler().build_row_num_sql(spec, true, &row_num))
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
            .build_row_num_jump_sql(spec, window.row_number()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_spec::{GroupBy, SelectField, SortOrder};

    #[test]
    fn test_queries() {
        let spec = QuerySpec::builder("TASK_DEFINITIONS")
            .order_by("DEFINITION_NAME", SortOrder::Asc)
            .build()
            .unwrap();

        assert_eq!(
            OracleDialect.first_page_query(&spec, 10).unwrap().sql(),
            "SELECT * FROM (SELECT * FROM TASK_DEFINITIONS ORDER BY DEFINITION_NAME ASC) WHERE ROWNUM <= 10"
        );
        assert_eq!(
            OracleDialect.jump_to_item_query(&spec, 25, 10).unwrap().sql(),
            "SELECT DEFINITION_NAME FROM (SELECT DEFINITION_NAME, ROWNUM AS TMP_ROW_NUM FROM (SELECT * FROM TASK_DEFINITIONS ORDER BY DEFINITION_NAME ASC)) WHERE TMP_ROW_NUM = 20"
        );
    }

    #[test]
    fn test_grouped_query_has_no_as_keyword() {
        let spec = QuerySpec::builder("TASK_EXECUTION")
            .select(SelectField::field("TASK_NAME"))
            .select(SelectField::count_all().with_alias("EXECUTIONS"))
            .group_by(GroupBy::single("TASK_NAME"))
            .order_by("TASK_NAME", SortOrder::Asc)
            .build()
            .unwrap();

        let query = OracleDialect.remaining_pages_query(&spec, 10).unwrap();
        assert_eq!(
            query.sql(),
            "SELECT * FROM (SELECT TASK_NAME, COUNT(*) AS EXECUTIONS FROM TASK_EXECUTION GROUP BY TASK_NAME ORDER BY TASK_NAME ASC) WHERE ROWNUM <= 10 AND ((TASK_NAME > ?))"
        );
        assert!(OracleDialect.count_query(&spec).sql().ends_with(") COUNT_QRY"));
    }
}
