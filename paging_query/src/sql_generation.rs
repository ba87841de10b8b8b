//! Shared SQL fragment assembly
//!
//! [`SqlAssembler`] owns the dialect-neutral skeleton of every paging query:
//! select list, FROM/JOIN, WHERE, GROUP BY/HAVING, ORDER BY and the keyset
//! resume predicate. Dialects only hand it the row-limiting text they need
//! (`LIMIT 10`, `TOP 10`, `ROWNUM <= 10`, ...).
//!
//! Parameters are collected in the order their placeholders are written, so
//! numbered placeholders (`$1`, `$2`) always line up with the returned list.

use crate::generated::{GeneratedQuery, PlaceholderStyle, Placeholders, QueryParameter};
use crate::query_spec::filter::{
    LogicalOperator, QueryCondition, QueryFilter, QueryOperator, LIKE_ESCAPE,
};
use crate::query_spec::ordering::SortKey;
use crate::query_spec::QuerySpec;
use serde_json::Value;

/// Name of the derived table wrapping grouped queries
pub const MAIN_QUERY_ALIAS: &str = "MAIN_QRY";
/// Row-number column used by the nested jump-to queries
pub const ROW_NUMBER_ALIAS: &str = "TMP_ROW_NUM";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlAssembler {
    style: PlaceholderStyle,
    derived_table_as: bool,
}

impl SqlAssembler {
    pub fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            derived_table_as: true,
        }
    }

    /// Alias derived tables without the `AS` keyword (Oracle rejects it)
    pub fn without_derived_table_as(mut self) -> Self {
        self.derived_table_as = false;
        self
    }

    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.style
    }

    /// `SELECT .. FROM .. [WHERE ..] [GROUP BY ..] ORDER BY .. <limit_clause>`
    ///
    /// With `remaining_pages` set the resume predicate is ANDed to the where
    /// clause.
    pub fn build_limit_sql(
        &self,
        spec: &QuerySpec,
        remaining_pages: bool,
        limit_clause: &str,
    ) -> GeneratedQuery {
        let mut w = SqlWriter::new(spec, self.style);
        w.push("SELECT ");
        w.push(&spec.select_clause());
        w.push(" FROM ");
        w.push(&spec.from_clause());
        w.where_clause(remaining_pages);
        w.group_by_clause();
        w.push(" ORDER BY ");
        w.sort_clause(false);
        w.push(" ");
        w.push(limit_clause);
        w.finish()
    }

    /// Grouped variant of [`build_limit_sql`](Self::build_limit_sql).
    ///
    /// The aggregation runs in a derived table and the resume predicate is
    /// applied to its output, so keys may reference aggregate aliases.
    pub fn build_grouped_limit_sql(
        &self,
        spec: &QuerySpec,
        remaining_pages: bool,
        limit_clause: &str,
    ) -> GeneratedQuery {
        let mut w = SqlWriter::new(spec, self.style);
        w.push("SELECT * FROM ");
        self.grouped_source(&mut w);
        if remaining_pages {
            w.push(" WHERE ");
            w.resume_conditions(true);
        }
        w.push(" ORDER BY ");
        w.sort_clause(true);
        w.push(" ");
        w.push(limit_clause);
        w.finish()
    }

    /// Select only the sort-key columns of the row picked by `limit_clause`
    pub fn build_jump_to_sql(&self, spec: &QuerySpec, limit_clause: &str) -> GeneratedQuery {
        let mut w = SqlWriter::new(spec, self.style);
        let grouped = spec.has_group_by();
        w.push("SELECT ");
        w.sort_key_select(grouped);
        w.push(" FROM ");
        if grouped {
            self.grouped_source(&mut w);
        } else {
            w.push(&spec.from_clause());
            w.where_clause(false);
        }
        w.push(" ORDER BY ");
        w.sort_clause(grouped);
        w.push(" ");
        w.push(limit_clause);
        w.finish()
    }

    /// `SELECT <top_clause> .. FROM .. ORDER BY ..`
    pub fn build_top_sql(
        &self,
        spec: &QuerySpec,
        remaining_pages: bool,
        top_clause: &str,
    ) -> GeneratedQuery {
        let mut w = SqlWriter::new(spec, self.style);
        w.push("SELECT ");
        w.push(top_clause);
        w.push(" ");
        w.push(&spec.select_clause());
        w.push(" FROM ");
        w.push(&spec.from_clause());
        w.where_clause(remaining_pages);
        w.group_by_clause();
        w.push(" ORDER BY ");
        w.sort_clause(false);
        w.finish()
    }

    pub fn build_grouped_top_sql(
        &self,
        spec: &QuerySpec,
        remaining_pages: bool,
        top_clause: &str,
    ) -> GeneratedQuery {
        let mut w = SqlWriter::new(spec, self.style);
        w.push("SELECT ");
        w.push(top_clause);
        w.push(" * FROM ");
        self.grouped_source(&mut w);
        if remaining_pages {
            w.push(" WHERE ");
            w.resume_conditions(true);
        }
        w.push(" ORDER BY ");
        w.sort_clause(true);
        w.finish()
    }

    /// Ordered query nested in an outer select filtered by `row_num_clause`
    /// (`ROWNUM <= n`); the resume predicate joins the outer filter.
    pub fn build_row_num_sql(
        &self,
        spec: &QuerySpec,
        remaining_pages: bool,
        row_num_clause: &str,
    ) -> GeneratedQuery {
        let mut w = SqlWriter::new(spec, self.style);
        w.push("SELECT * FROM (");
        self.ordered_inner(&mut w);
        w.push(") WHERE ");
        w.push(row_num_clause);
        if remaining_pages {
            w.push(" AND ");
            w.resume_conditions(true);
        }
        w.finish()
    }

    /// Sort keys of the row whose 1-based `ROWNUM` equals `row_number`
    pub fn build_row_num_jump_sql(&self, spec: &QuerySpec, row_number: i64) -> GeneratedQuery {
        let mut w = SqlWriter::new(spec, self.style);
        w.push("SELECT ");
        w.sort_key_select(true);
        w.push(" FROM (SELECT ");
        w.sort_key_select(true);
        w.push(", ROWNUM AS ");
        w.push(ROW_NUMBER_ALIAS);
        w.push(" FROM (");
        self.ordered_inner(&mut w);
        w.push(")) WHERE ");
        w.push(ROW_NUMBER_ALIAS);
        w.push(" = ");
        w.push(&row_number.to_string());
        w.finish()
    }

    /// Sort keys of the row whose 1-based `ROW_NUMBER()` equals `row_number`
    pub fn build_row_number_jump_sql(&self, spec: &QuerySpec, row_number: i64) -> GeneratedQuery {
        let mut w = SqlWriter::new(spec, self.style);
        let grouped = spec.has_group_by();
        w.push("SELECT ");
        w.sort_key_select(true);
        w.push(" FROM (SELECT ");
        w.sort_key_select(grouped);
        w.push(", ROW_NUMBER() OVER (ORDER BY ");
        w.sort_clause(grouped);
        w.push(") AS ");
        w.push(ROW_NUMBER_ALIAS);
        w.push(" FROM ");
        if grouped {
            self.grouped_source(&mut w);
        } else {
            w.push(&spec.from_clause());
            w.where_clause(false);
        }
        w.push(")");
        w.push(&self.derived_alias("TMP_SUB"));
        w.push(" WHERE TMP_SUB.");
        w.push(ROW_NUMBER_ALIAS);
        w.push(" = ");
        w.push(&row_number.to_string());
        w.finish()
    }

    /// Total number of rows (or groups) the query yields
    pub fn build_count_sql(&self, spec: &QuerySpec) -> GeneratedQuery {
        let mut w = SqlWriter::new(spec, self.style);
        w.push("SELECT COUNT(*) FROM ");
        if spec.has_group_by() {
            w.push("(SELECT ");
            w.push(&spec.select_clause());
            w.push(" FROM ");
            w.push(&spec.from_clause());
            w.where_clause(false);
            w.group_by_clause();
            w.push(")");
            w.push(&self.derived_alias("COUNT_QRY"));
        } else {
            w.push(&spec.from_clause());
            w.where_clause(false);
        }
        w.finish()
    }

    fn grouped_source(&self, w: &mut SqlWriter<'_>) {
        let spec = w.spec;
        w.push("(SELECT ");
        w.push(&spec.select_clause());
        w.push(" FROM ");
        w.push(&spec.from_clause());
        w.where_clause(false);
        w.group_by_clause();
        w.push(")");
        w.push(&self.derived_alias(MAIN_QUERY_ALIAS));
    }

    fn ordered_inner(&self, w: &mut SqlWriter<'_>) {
        let spec = w.spec;
        w.push("SELECT ");
        w.push(&spec.select_clause());
        w.push(" FROM ");
        w.push(&spec.from_clause());
        w.where_clause(false);
        w.group_by_clause();
        w.push(" ORDER BY ");
        w.sort_clause(false);
    }

    fn derived_alias(&self, alias: &str) -> String {
        if self.derived_table_as {
            format!(" AS {}", alias)
        } else {
            format!(" {}", alias)
        }
    }
}

/// Accumulates SQL text and parameters for one generated query
struct SqlWriter<'a> {
    spec: &'a QuerySpec,
    sql: String,
    parameters: Vec<QueryParameter>,
    placeholders: Placeholders,
}

impl<'a> SqlWriter<'a> {
    fn new(spec: &'a QuerySpec, style: PlaceholderStyle) -> Self {
        Self {
            spec,
            sql: String::with_capacity(256),
            parameters: Vec::new(),
            placeholders: Placeholders::new(style),
        }
    }

    fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    fn finish(self) -> GeneratedQuery {
        GeneratedQuery::new(self.sql, self.parameters)
    }

    fn where_clause(&mut self, remaining_pages: bool) {
        let spec = self.spec;
        let filters = spec.filters();
        if filters.is_empty() && !remaining_pages {
            return;
        }

        self.push(" WHERE ");
        if !filters.is_empty() {
            let conditions = self.conditions_sql(filters);
            if remaining_pages {
                self.push("(");
                self.push(&conditions);
                self.push(") AND ");
            } else {
                self.push(&conditions);
            }
        }
        if remaining_pages {
            self.resume_conditions(false);
        }
    }

    fn group_by_clause(&mut self) {
        let spec = self.spec;
        let Some(group) = spec.group_by() else {
            return;
        };
        if group.is_empty() {
            return;
        }

        self.push(" GROUP BY ");
        self.push(&group.fields.join(", "));

        if let Some(having) = group.having.as_ref().filter(|h| !h.is_empty()) {
            let conditions = self.conditions_sql(having);
            self.push(" HAVING ");
            self.push(&conditions);
        }
    }

    fn sort_clause(&mut self, unaliased: bool) {
        let clause = self
            .spec
            .sort_keys()
            .iter()
            .map(|key| format!("{} {}", Self::key_expr(key, unaliased), key.order.to_sql()))
            .collect::<Vec<_>>()
            .join(", ");
        self.push(&clause);
    }

    fn sort_key_select(&mut self, unaliased: bool) {
        let select = self
            .spec
            .sort_keys()
            .iter()
            .map(|key| Self::key_column(key, unaliased))
            .collect::<Vec<_>>()
            .join(", ");
        self.push(&select);
    }

    /// `((k1 > ?) OR (k1 = ? AND k2 > ?) OR ...)`
    ///
    /// Keys with a NULL substitute compare `COALESCE(k, literal)` on both
    /// sides, so a NULL resume value still selects the rows after it.
    fn resume_conditions(&mut self, unaliased: bool) {
        let spec = self.spec;
        let keys = spec.sort_keys();
        let mut clauses = Vec::with_capacity(keys.len());

        for (i, key) in keys.iter().enumerate() {
            let mut parts = Vec::with_capacity(i + 1);
            for earlier in &keys[..i] {
                let placeholder = self.resume_placeholder(earlier);
                parts.push(format!(
                    "{} = {}",
                    Self::key_expr(earlier, unaliased),
                    Self::coalesced(earlier, placeholder)
                ));
            }
            let placeholder = self.resume_placeholder(key);
            parts.push(format!(
                "{} {} {}",
                Self::key_expr(key, unaliased),
                key.order.resume_operator(),
                Self::coalesced(key, placeholder)
            ));
            clauses.push(format!("({})", parts.join(" AND ")));
        }

        self.push("(");
        self.push(&clauses.join(" OR "));
        self.push(")");
    }

    fn resume_placeholder(&mut self, key: &SortKey) -> String {
        self.parameters
            .push(QueryParameter::ResumeKey(key.unaliased().to_string()));
        self.placeholders.next()
    }

    fn key_column(key: &SortKey, unaliased: bool) -> &str {
        if unaliased {
            key.unaliased()
        } else {
            &key.column
        }
    }

    /// Column as ordered and compared: `COALESCE(column, literal)` when the
    /// key has a NULL substitute
    fn key_expr(key: &SortKey, unaliased: bool) -> String {
        Self::coalesced(key, Self::key_column(key, unaliased).to_string())
    }

    fn coalesced(key: &SortKey, operand: String) -> String {
        match &key.nulls_as {
            Some(literal) => format!("COALESCE({}, {})", operand, literal),
            None => operand,
        }
    }

    fn conditions_sql(&mut self, filters: &[QueryFilter]) -> String {
        filters
            .iter()
            .map(|filter| self.filter_sql(filter))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn filter_sql(&mut self, filter: &QueryFilter) -> String {
        match filter {
            QueryFilter::Condition(condition) => self.condition_sql(condition),
            QueryFilter::Raw(predicate) => format!("({})", predicate),
            QueryFilter::Group { operator, filters } => {
                if filters.is_empty() {
                    return match operator {
                        LogicalOperator::And => "1=1".to_string(),
                        LogicalOperator::Or => "1=0".to_string(),
                    };
                }

                let operator_str = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };

                let group_conditions = filters
                    .iter()
                    .map(|f| self.filter_sql(f))
                    .collect::<Vec<_>>()
                    .join(operator_str);

                format!("({})", group_conditions)
            }
        }
    }

    fn condition_sql(&mut self, condition: &QueryCondition) -> String {
        let field = &condition.field;

        match (&condition.operator, &condition.value) {
            (QueryOperator::IsNull, _) | (QueryOperator::Eq, None) => {
                format!("{} IS NULL", field)
            }
            (QueryOperator::IsNotNull, _) | (QueryOperator::Ne, None) => {
                format!("{} IS NOT NULL", field)
            }
            (QueryOperator::In, Some(Value::Array(values))) => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                format!("{} IN ({})", field, self.value_list(values))
            }
            (QueryOperator::NotIn, Some(Value::Array(values))) => {
                if values.is_empty() {
                    return "1=1".to_string();
                }
                format!("{} NOT IN ({})", field, self.value_list(values))
            }
            (QueryOperator::LikeEscaped, Some(value)) => {
                let placeholder = self.value_placeholder(value);
                format!("{} LIKE {} ESCAPE '{}'", field, placeholder, LIKE_ESCAPE)
            }
            (QueryOperator::In, _) => "1=0".to_string(),
            (QueryOperator::NotIn, _) => "1=1".to_string(),
            (operator, Some(value)) => match operator.comparison_sql() {
                Some(op) => {
                    let placeholder = self.value_placeholder(value);
                    format!("{} {} {}", field, op, placeholder)
                }
                None => "1=0".to_string(),
            },
            // Ordering comparisons against no value match nothing
            (_, None) => "1=0".to_string(),
        }
    }

    fn value_list(&mut self, values: &[Value]) -> String {
        values
            .iter()
            .map(|value| self.value_placeholder(value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn value_placeholder(&mut self, value: &Value) -> String {
        self.parameters.push(QueryParameter::Value(value.clone()));
        self.placeholders.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_spec::{GroupBy, QueryFilter, SelectField, SortKey, SortOrder};
    use serde_json::json;

    fn definitions_spec() -> QuerySpec {
        QuerySpec::builder("TASK_DEFINITIONS")
            .columns(&["DEFINITION_NAME", "DEFINITION", "DESCRIPTION"])
            .order_by("DEFINITION_NAME", SortOrder::Asc)
            .build()
            .unwrap()
    }

    fn grouped_spec() -> QuerySpec {
        QuerySpec::builder("TASK_EXECUTION")
            .select(SelectField::field("TASK_NAME"))
            .select(SelectField::count_all().with_alias("EXECUTIONS"))
            .filter(QueryFilter::is_not_null("END_TIME"))
            .group_by(GroupBy::single("TASK_NAME").having(QueryFilter::gt("COUNT(*)", json!(1))))
            .order_by("TASK_NAME", SortOrder::Asc)
            .build()
            .unwrap()
    }

    #[test]
    fn test_limit_sql_first_page() {
        let query =
            SqlAssembler::new(PlaceholderStyle::Question).build_limit_sql(&definitions_spec(), false, "LIMIT 10");

        assert_eq!(
            query.sql(),
            "SELECT DEFINITION_NAME, DEFINITION, DESCRIPTION FROM TASK_DEFINITIONS ORDER BY DEFINITION_NAME ASC LIMIT 10"
        );
        assert!(query.parameters().is_empty());
    }

    #[test]
    fn test_limit_sql_remaining_pages_with_filter() {
        let spec = QuerySpec::builder("TASK_DEFINITIONS")
            .filter(QueryFilter::contains("DEFINITION_NAME", "etl"))
            .order_by("DEFINITION_NAME", SortOrder::Asc)
            .build()
            .unwrap();

        let query = SqlAssembler::new(PlaceholderStyle::Question).build_limit_sql(&spec, true, "LIMIT 5");

        assert_eq!(
            query.sql(),
            "SELECT * FROM TASK_DEFINITIONS WHERE (DEFINITION_NAME LIKE ? ESCAPE '!') AND ((DEFINITION_NAME > ?)) ORDER BY DEFINITION_NAME ASC LIMIT 5"
        );
        assert_eq!(
            query.parameters(),
            &[
                QueryParameter::Value(json!("%etl%")),
                QueryParameter::ResumeKey("DEFINITION_NAME".to_string()),
            ]
        );
    }

    #[test]
    fn test_resume_conditions_for_composite_keys() {
        let spec = QuerySpec::builder("TASK_EXECUTION")
            .alias("E")
            .order_by("E.START_TIME", SortOrder::Desc)
            .order_by("E.TASK_EXECUTION_ID", SortOrder::Asc)
            .build()
            .unwrap();

        let query = SqlAssembler::new(PlaceholderStyle::Dollar).build_limit_sql(&spec, true, "LIMIT 20");

        assert_eq!(
            query.sql(),
            "SELECT * FROM TASK_EXECUTION E WHERE ((E.START_TIME < $1) OR (E.START_TIME = $2 AND E.TASK_EXECUTION_ID > $3)) ORDER BY E.START_TIME DESC, E.TASK_EXECUTION_ID ASC LIMIT 20"
        );
        assert_eq!(
            query.parameters(),
            &[
                QueryParameter::ResumeKey("START_TIME".to_string()),
                QueryParameter::ResumeKey("START_TIME".to_string()),
                QueryParameter::ResumeKey("TASK_EXECUTION_ID".to_string()),
            ]
        );
    }

    #[test]
    fn test_nullable_sort_key_coalesced_in_order_and_resume() {
        let spec = QuerySpec::builder("TASK_DEFINITIONS")
            .sort_key(SortKey::asc("DESCRIPTION").nulls_as("' '"))
            .order_by("DEFINITION_NAME", SortOrder::Asc)
            .build()
            .unwrap();
        let assembler = SqlAssembler::new(PlaceholderStyle::Question);

        assert_eq!(
            assembler.build_limit_sql(&spec, true, "LIMIT 2").sql(),
            "SELECT * FROM TASK_DEFINITIONS WHERE ((COALESCE(DESCRIPTION, ' ') > COALESCE(?, ' ')) OR (COALESCE(DESCRIPTION, ' ') = COALESCE(?, ' ') AND DEFINITION_NAME > ?)) ORDER BY COALESCE(DESCRIPTION, ' ') ASC, DEFINITION_NAME ASC LIMIT 2"
        );
        // The jump query still returns the raw column for the resume row
        assert_eq!(
            assembler.build_jump_to_sql(&spec, "LIMIT 1, 1").sql(),
            "SELECT DESCRIPTION, DEFINITION_NAME FROM TASK_DEFINITIONS ORDER BY COALESCE(DESCRIPTION, ' ') ASC, DEFINITION_NAME ASC LIMIT 1, 1"
        );
    }

    #[test]
    fn test_grouped_limit_sql() {
        let query =
            SqlAssembler::new(PlaceholderStyle::Dollar).build_grouped_limit_sql(&grouped_spec(), true, "LIMIT 10");

        assert_eq!(
            query.sql(),
            "SELECT * FROM (SELECT TASK_NAME, COUNT(*) AS EXECUTIONS FROM TASK_EXECUTION WHERE END_TIME IS NOT NULL GROUP BY TASK_NAME HAVING COUNT(*) > $1) AS MAIN_QRY WHERE ((TASK_NAME > $2)) ORDER BY TASK_NAME ASC LIMIT 10"
        );
        assert_eq!(
            query.parameters(),
            &[
                QueryParameter::Value(json!(1)),
                QueryParameter::ResumeKey("TASK_NAME".to_string()),
            ]
        );
    }

    #[test]
    fn test_jump_to_sql() {
        let query = SqlAssembler::new(PlaceholderStyle::Question)
            .build_jump_to_sql(&definitions_spec(), "LIMIT 19, 1");

        assert_eq!(
            query.sql(),
            "SELECT DEFINITION_NAME FROM TASK_DEFINITIONS ORDER BY DEFINITION_NAME ASC LIMIT 19, 1"
        );
    }

    #[test]
    fn test_grouped_jump_to_sql_wraps_aggregation() {
        let query = SqlAssembler::new(PlaceholderStyle::Question)
            .build_jump_to_sql(&grouped_spec(), "LIMIT 4, 1");

        assert_eq!(
            query.sql(),
            "SELECT TASK_NAME FROM (SELECT TASK_NAME, COUNT(*) AS EXECUTIONS FROM TASK_EXECUTION WHERE END_TIME IS NOT NULL GROUP BY TASK_NAME HAVING COUNT(*) > ?) AS MAIN_QRY ORDER BY TASK_NAME ASC LIMIT 4, 1"
        );
    }

    #[test]
    fn test_top_sql() {
        let assembler = SqlAssembler::new(PlaceholderStyle::Question);

        assert_eq!(
            assembler.build_top_sql(&definitions_spec(), true, "TOP 10").sql(),
            "SELECT TOP 10 DEFINITION_NAME, DEFINITION, DESCRIPTION FROM TASK_DEFINITIONS WHERE ((DEFINITION_NAME > ?)) ORDER BY DEFINITION_NAME ASC"
        );
        assert_eq!(
            assembler.build_grouped_top_sql(&grouped_spec(), true, "TOP 10").sql(),
            "SELECT TOP 10 * FROM (SELECT TASK_NAME, COUNT(*) AS EXECUTIONS FROM TASK_EXECUTION WHERE END_TIME IS NOT NULL GROUP BY TASK_NAME HAVING COUNT(*) > ?) AS MAIN_QRY WHERE ((TASK_NAME > ?)) ORDER BY TASK_NAME ASC"
        );
    }

    #[test]
    fn test_row_num_sql() {
        let assembler = SqlAssembler::new(PlaceholderStyle::Question).without_derived_table_as();

        assert_eq!(
            assembler.build_row_num_sql(&definitions_spec(), true, "ROWNUM <= 10").sql(),
            "SELECT * FROM (SELECT DEFINITION_NAME, DEFINITION, DESCRIPTION FROM TASK_DEFINITIONS ORDER BY DEFINITION_NAME ASC) WHERE ROWNUM <= 10 AND ((DEFINITION_NAME > ?))"
        );
        assert_eq!(
            assembler.build_row_num_jump_sql(&definitions_spec(), 20).sql(),
            "SELECT DEFINITION_NAME FROM (SELECT DEFINITION_NAME, ROWNUM AS TMP_ROW_NUM FROM (SELECT DEFINITION_NAME, DEFINITION, DESCRIPTION FROM TASK_DEFINITIONS ORDER BY DEFINITION_NAME ASC)) WHERE TMP_ROW_NUM = 20"
        );
    }

    #[test]
    fn test_row_number_jump_sql() {
        let spec = QuerySpec::builder("TASK_EXECUTION")
            .alias("E")
            .filter(QueryFilter::eq("E.TASK_NAME", json!("ingest")))
            .order_by("E.TASK_EXECUTION_ID", SortOrder::Desc)
            .build()
            .unwrap();

        let query = SqlAssembler::new(PlaceholderStyle::Question).build_row_number_jump_sql(&spec, 10);

        assert_eq!(
            query.sql(),
            "SELECT TASK_EXECUTION_ID FROM (SELECT E.TASK_EXECUTION_ID, ROW_NUMBER() OVER (ORDER BY E.TASK_EXECUTION_ID DESC) AS TMP_ROW_NUM FROM TASK_EXECUTION E WHERE E.TASK_NAME = ?) AS TMP_SUB WHERE TMP_SUB.TMP_ROW_NUM = 10"
        );
        assert_eq!(query.parameters(), &[QueryParameter::Value(json!("ingest"))]);
    }

    #[test]
    fn test_count_sql() {
        let assembler = SqlAssembler::new(PlaceholderStyle::Question);

        assert_eq!(
            assembler.build_count_sql(&definitions_spec()).sql(),
            "SELECT COUNT(*) FROM TASK_DEFINITIONS"
        );
        assert_eq!(
            assembler.build_count_sql(&grouped_spec()).sql(),
            "SELECT COUNT(*) FROM (SELECT TASK_NAME, COUNT(*) AS EXECUTIONS FROM TASK_EXECUTION WHERE END_TIME IS NOT NULL GROUP BY TASK_NAME HAVING COUNT(*) > ?) AS COUNT_QRY"
        );
    }

    #[test]
    fn test_filter_rendering() {
        let spec = QuerySpec::builder("T")
            .filter(QueryFilter::or(vec![
                QueryFilter::eq("STATUS", json!("COMPLETE")),
                QueryFilter::eq("STATUS", json!("ERROR")),
            ]))
            .filter(QueryFilter::in_values("EXIT_CODE", vec![json!(0), json!(1)]))
            .filter(QueryFilter::in_values("TASK_NAME", vec![]))
            .filter(QueryFilter::raw("END_TIME > START_TIME"))
            .filter(QueryFilter::and(vec![]))
            .order_by("ID", SortOrder::Asc)
            .build()
            .unwrap();

        let query = SqlAssembler::new(PlaceholderStyle::Dollar).build_count_sql(&spec);

        assert_eq!(
            query.sql(),
            "SELECT COUNT(*) FROM T WHERE (STATUS = $1 OR STATUS = $2) AND EXIT_CODE IN ($3, $4) AND 1=0 AND (END_TIME > START_TIME) AND 1=1"
        );
        assert_eq!(
            query.values().unwrap(),
            vec![json!("COMPLETE"), json!("ERROR"), json!(0), json!(1)]
        );
    }
}
