//! Generated query output
//!
//! A [`GeneratedQuery`] is the SQL text plus the ordered list of parameters
//! its placeholders expect. Filter values are carried as-is; resume keys
//! name a sort-key column whose last-seen value is bound when the next page
//! is read.

use serde_json::{Map, Value};
use std::fmt;

use crate::errors::PagingError;

/// How a dialect spells bind placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` (MySQL, MariaDB, SQLite, H2, SQL Server, DB2, Oracle via JDBC-style drivers)
    Question,
    /// `$1`, `$2`, ... (PostgreSQL)
    Dollar,
}

impl PlaceholderStyle {
    /// Placeholder for the 1-based parameter `position`
    pub fn placeholder(&self, position: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${}", position),
        }
    }

    /// Comma-separated placeholders for positions `first..first + count`
    pub fn placeholder_list(&self, first: usize, count: usize) -> String {
        (first..first + count)
            .map(|position| self.placeholder(position))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Hands out placeholders in the order they appear in the SQL text
#[derive(Debug)]
pub(crate) struct Placeholders {
    style: PlaceholderStyle,
    issued: usize,
}

impl Placeholders {
    pub(crate) fn new(style: PlaceholderStyle) -> Self {
        Self { style, issued: 0 }
    }

    pub(crate) fn next(&mut self) -> String {
        self.issued += 1;
        self.style.placeholder(self.issued)
    }
}

/// A parameter expected by a generated query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParameter {
    /// A filter value supplied with the query specification
    Value(Value),
    /// Last-seen value of the named sort-key column
    ResumeKey(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuery {
    sql: String,
    parameters: Vec<QueryParameter>,
}

impl GeneratedQuery {
    pub(crate) fn new(sql: String, parameters: Vec<QueryParameter>) -> Self {
        Self { sql, parameters }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn into_sql(self) -> String {
        self.sql
    }

    pub fn parameters(&self) -> &[QueryParameter] {
        &self.parameters
    }

    /// True when the query must be given a resume row before it can run
    pub fn needs_resume_row(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| matches!(p, QueryParameter::ResumeKey(_)))
    }

    /// Values for a query that takes no resume keys
    pub fn values(&self) -> Result<Vec<Value>, PagingError> {
        self.bind_values(&Map::new())
    }

    /// Resolve every parameter to a concrete value.
    ///
    /// Resume keys are looked up in `resume_row` by column name,
    /// case-insensitively, since drivers disagree on identifier case.
    pub fn bind_values(&self, resume_row: &Map<String, Value>) -> Result<Vec<Value>, PagingError> {
        self.parameters
            .iter()
            .map(|parameter| match parameter {
                QueryParameter::Value(value) => Ok(value.clone()),
                QueryParameter::ResumeKey(column) => resume_row
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(column))
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| PagingError::MissingResumeKey(column.clone())),
            })
            .collect()
    }
}

impl fmt::Display for GeneratedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
