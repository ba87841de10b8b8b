//! Query specification
//!
//! A [`QuerySpec`] is the dialect-neutral description of a pageable query.
//! It is assembled with [`QuerySpecBuilder`] and validated once on `build()`,
//! after which it is immutable and can be shared across threads.

use crate::errors::PagingError;
use crate::query_spec::aggregation::SelectField;
use crate::query_spec::filter::QueryFilter;
use crate::query_spec::grouping::GroupBy;
use crate::query_spec::join::JoinClause;
use crate::query_spec::ordering::{SortKey, SortOrder};
use crate::validation::ValidatedIdentifier;

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub(crate) select: Vec<SelectField>,
    pub(crate) table: String,
    pub(crate) alias: Option<String>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) filters: Vec<QueryFilter>,
    pub(crate) group_by: Option<GroupBy>,
    pub(crate) sort_keys: Vec<SortKey>,
}

impl QuerySpec {
    pub fn builder(table: impl Into<String>) -> QuerySpecBuilder {
        QuerySpecBuilder::new(table)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn select_fields(&self) -> &[SelectField] {
        &self.select
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn filters(&self) -> &[QueryFilter] {
        &self.filters
    }

    pub fn group_by(&self) -> Option<&GroupBy> {
        self.group_by.as_ref()
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    /// True when a non-empty GROUP BY is declared
    pub fn has_group_by(&self) -> bool {
        self.group_by.as_ref().is_some_and(|group| !group.is_empty())
    }

    pub fn has_where(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn select_clause(&self) -> String {
        self.select
            .iter()
            .map(SelectField::to_sql)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn from_clause(&self) -> String {
        let mut from = match &self.alias {
            Some(alias) => format!("{} {}", self.table, alias),
            None => self.table.clone(),
        };

        for join in &self.joins {
            from.push(' ');
            from.push_str(&join.to_sql());
        }

        from
    }
}

/// Fluent builder for [`QuerySpec`]
#[derive(Debug, Clone)]
pub struct QuerySpecBuilder {
    select: Vec<SelectField>,
    table: String,
    alias: Option<String>,
    joins: Vec<JoinClause>,
    filters: Vec<QueryFilter>,
    group_by: Option<GroupBy>,
    sort_keys: Vec<SortKey>,
}

impl QuerySpecBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            select: Vec::new(),
            table: table.into(),
            alias: None,
            joins: Vec::new(),
            filters: Vec::new(),
            group_by: None,
            sort_keys: Vec::new(),
        }
    }

    /// Alias for the main table, used to qualify columns when joining
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn select(mut self, field: SelectField) -> Self {
        self.select.push(field);
        self
    }

    pub fn select_fields(mut self, fields: Vec<SelectField>) -> Self {
        self.select.extend(fields);
        self
    }

    /// Shorthand for selecting plain columns
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.select
            .extend(columns.iter().map(|column| SelectField::field(*column)));
        self
    }

    pub fn join(mut self, join: JoinClause) -> Self {
        self.joins.push(join);
        self
    }

    /// Add a filter condition (combined with AND)
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn order_by(mut self, column: &str, order: SortOrder) -> Self {
        self.sort_keys.push(SortKey::new(column, order));
        self
    }

    pub fn sort_key(mut self, key: SortKey) -> Self {
        self.sort_keys.push(key);
        self
    }

    pub fn sort_keys(mut self, keys: Vec<SortKey>) -> Self {
        self.sort_keys.extend(keys);
        self
    }

    pub fn build(self) -> Result<QuerySpec, PagingError> {
        ValidatedIdentifier::simple(&self.table)?;
        if let Some(alias) = &self.alias {
            ValidatedIdentifier::simple(alias)?;
        }

        if self.sort_keys.is_empty() {
            return Err(PagingError::InvalidQuerySpec(format!(
                "query on '{}' needs at least one sort key",
                self.table
            )));
        }

        for (i, key) in self.sort_keys.iter().enumerate() {
            ValidatedIdentifier::column(&key.column)?;
            if let Some(literal) = &key.nulls_as {
                if !is_plain_literal(literal) {
                    return Err(PagingError::InvalidQuerySpec(format!(
                        "NULL substitute {} for sort key '{}' is not a plain literal",
                        literal, key.column
                    )));
                }
            }
            let duplicate = self.sort_keys[..i]
                .iter()
                .any(|earlier| earlier.unaliased().eq_ignore_ascii_case(key.unaliased()));
            if duplicate {
                return Err(PagingError::InvalidQuerySpec(format!(
                    "sort key '{}' is declared more than once",
                    key.column
                )));
            }
        }

        if let Some(group_by) = &self.group_by {
            for field in &group_by.fields {
                ValidatedIdentifier::column(field)?;
            }
        }

        for field in &self.select {
            Self::validate_select_field(field)?;
        }

        let select = if self.select.is_empty() {
            vec![SelectField::All]
        } else {
            self.select
        };

        Ok(QuerySpec {
            select,
            table: self.table,
            alias: self.alias,
            joins: self.joins,
            filters: self.filters,
            group_by: self.group_by,
            sort_keys: self.sort_keys,
        })
    }

    fn validate_select_field(field: &SelectField) -> Result<(), PagingError> {
        match field {
            SelectField::All => {}
            SelectField::Field(name) => {
                ValidatedIdentifier::column(name)?;
            }
            SelectField::FieldWithAlias { field, alias } => {
                ValidatedIdentifier::column(field)?;
                ValidatedIdentifier::simple(alias)?;
            }
            SelectField::Aggregate { field, alias, .. } => {
                if let Some(field) = field {
                    ValidatedIdentifier::column(field)?;
                }
                if let Some(alias) = alias {
                    ValidatedIdentifier::simple(alias)?;
                }
            }
        }
        Ok(())
    }
}

/// A single-quoted string without embedded quotes, or an integer
fn is_plain_literal(literal: &str) -> bool {
    match literal.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
        Some(inner) => !inner.contains('\'') && !inner.contains('\\'),
        None => {
            let digits = literal.strip_prefix('-').unwrap_or(literal);
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
    }
}
