//! Sort keys
//!
//! The ordered sort keys of a query double as its keyset: paging resumes
//! after the last-seen tuple of sort-key values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PagingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Comparison operator that selects rows *after* a key in this order
    pub(crate) fn resume_operator(&self) -> &'static str {
        match self {
            SortOrder::Asc => ">",
            SortOrder::Desc => "<",
        }
    }
}

impl FromStr for SortOrder {
    type Err = PagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => Ok(SortOrder::Asc),
            "DESC" | "DESCENDING" => Ok(SortOrder::Desc),
            other => Err(PagingError::InvalidArgument(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

/// A single `(column, direction)` sort key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub column: String,
    pub order: SortOrder,
    /// SQL literal standing in for NULL when ordering and resuming
    pub nulls_as: Option<String>,
}

impl SortKey {
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
            nulls_as: None,
        }
    }

    /// Order and resume on `COALESCE(column, literal)`.
    ///
    /// A keyset predicate never matches a NULL resume value, so nullable
    /// columns must be given a substitute to be paged across.
    pub fn nulls_as(mut self, literal: impl Into<String>) -> Self {
        self.nulls_as = Some(literal.into());
        self
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Desc)
    }

    /// Column name with any `alias.` qualifier stripped.
    ///
    /// Outer queries that wrap a derived table, and result rows, only know
    /// the bare column name.
    pub fn unaliased(&self) -> &str {
        match self.column.split_once('.') {
            Some((_, column)) => column,
            None => &self.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!(" Descending ".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_resume_operator() {
        assert_eq!(SortOrder::Asc.resume_operator(), ">");
        assert_eq!(SortOrder::Desc.resume_operator(), "<");
    }

    #[test]
    fn test_nulls_as() {
        let key = SortKey::asc("DESCRIPTION").nulls_as("' '");
        assert_eq!(key.nulls_as.as_deref(), Some("' '"));
        assert_eq!(key.unaliased(), "DESCRIPTION");
        assert_ne!(key, SortKey::asc("DESCRIPTION"));
    }

    #[test]
    fn test_unaliased() {
        assert_eq!(SortKey::asc("E.TASK_EXECUTION_ID").unaliased(), "TASK_EXECUTION_ID");
        assert_eq!(SortKey::desc("START_TIME").unaliased(), "START_TIME");
    }
}
