//! Query specification types
//!
//! Everything a paging dialect needs to know about the query being paged:
//! select list, source table and joins, filters, grouping and sort keys.

pub mod aggregation;
pub mod builder;
pub mod filter;
pub mod grouping;
pub mod join;
pub mod ordering;


pub use aggregation::{AggregateFunction, SelectField};
pub use builder::{QuerySpec, QuerySpecBuilder};
pub use filter::{escape_like, LogicalOperator, QueryCondition, QueryFilter, QueryOperator, LIKE_ESCAPE};
pub use grouping::GroupBy;
pub use join::{JoinClause, JoinCondition, JoinType};
pub use ordering::{SortKey, SortOrder};
