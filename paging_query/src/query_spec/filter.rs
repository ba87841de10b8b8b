//! Where-clause predicates
//!
//! Filters are AND-combined into the where clause of a query specification.
//! Values are never inlined: each one becomes a placeholder and is returned
//! alongside the generated SQL.

use serde_json::Value;

/// Query condition operators
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperator {
    Eq,        // =
    Ne,        // <>
    Gt,        // >
    Gte,       // >=
    Lt,        // <
    Lte,       // <=
    Like,      // LIKE
    LikeEscaped, // LIKE .. ESCAPE '!'
    In,        // IN
    NotIn,     // NOT IN
    IsNull,    // IS NULL
    IsNotNull, // IS NOT NULL
}

impl QueryOperator {
    pub(crate) fn comparison_sql(&self) -> Option<&'static str> {
        match self {
            QueryOperator::Eq => Some("="),
            QueryOperator::Ne => Some("<>"),
            QueryOperator::Gt => Some(">"),
            QueryOperator::Gte => Some(">="),
            QueryOperator::Lt => Some("<"),
            QueryOperator::Lte => Some("<="),
            QueryOperator::Like => Some("LIKE"),
            _ => None,
        }
    }
}

/// Escape character for [`QueryOperator::LikeEscaped`] patterns
pub const LIKE_ESCAPE: char = '!';

/// Escape `%`, `_` and the escape character so `fragment` matches literally
pub fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Single condition in WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub field: String,
    pub operator: QueryOperator,
    pub value: Option<Value>, // None for IS NULL/IS NOT NULL
}

/// Logical operators for combining conditions
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Query filter that can be nested
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Condition(QueryCondition),
    Group {
        operator: LogicalOperator,
        filters: Vec<QueryFilter>,
    },
    /// Trusted SQL predicate, emitted verbatim
    Raw(String),
}

impl QueryFilter {
    pub fn condition(field: &str, operator: QueryOperator, value: Option<Value>) -> Self {
        Self::Condition(QueryCondition {
            field: field.to_string(),
            operator,
            value,
        })
    }

    pub fn and(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::And,
            filters,
        }
    }

    pub fn or(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::Or,
            filters,
        }
    }

    pub fn raw(predicate: impl Into<String>) -> Self {
        Self::Raw(predicate.into())
    }

    pub fn eq(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Eq, Some(value))
    }

    pub fn ne(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Ne, Some(value))
    }

    pub fn gt(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Gt, Some(value))
    }

    pub fn gte(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Gte, Some(value))
    }

    pub fn lt(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Lt, Some(value))
    }

    pub fn lte(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Lte, Some(value))
    }

    pub fn like(field: &str, pattern: &str) -> Self {
        Self::condition(
            field,
            QueryOperator::Like,
            Some(Value::String(pattern.to_string())),
        )
    }

    /// `field LIKE %fragment%`, with wildcards in `fragment` matched literally
    pub fn contains(field: &str, fragment: &str) -> Self {
        Self::condition(
            field,
            QueryOperator::LikeEscaped,
            Some(Value::String(format!("%{}%", escape_like(fragment)))),
        )
    }

    pub fn in_values(field: &str, values: Vec<Value>) -> Self {
        Self::condition(field, QueryOperator::In, Some(Value::Array(values)))
    }

    pub fn not_in_values(field: &str, values: Vec<Value>) -> Self {
        Self::condition(field, QueryOperator::NotIn, Some(Value::Array(values)))
    }

    pub fn is_null(field: &str) -> Self {
        Self::condition(field, QueryOperator::IsNull, None)
    }

    pub fn is_not_null(field: &str) -> Self {
        Self::condition(field, QueryOperator::IsNotNull, None)
    }
}
