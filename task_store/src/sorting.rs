//! Mapping of API sort properties onto sort-key columns

use paging_query::{PageRequest, SortKey};

use crate::errors::StoreError;

/// Stands in for NULL in nullable text sort columns; `''` is NULL on Oracle
pub(crate) const NULL_TEXT: &str = "' '";

/// Translate the request's sort properties through `columns`
/// (`property -> column`). Without requested properties `default` is used.
/// Columns listed in `nullable` (`column -> SQL literal`) sort and resume
/// with NULL replaced by their literal.
/// `tie_breaker` is appended unless its column is already sorted on, so the
/// keyset is always unique.
pub(crate) fn sort_keys(
    request: &PageRequest,
    columns: &[(&str, &str)],
    nullable: &[(&str, &str)],
    default: SortKey,
    tie_breaker: SortKey,
) -> Result<Vec<SortKey>, StoreError> {
    let mut keys: Vec<SortKey> = Vec::new();

    for sort in request.sort() {
        let column = columns
            .iter()
            .find(|(property, _)| *property == sort.property)
            .map(|(_, column)| *column)
            .ok_or_else(|| StoreError::InvalidSortProperty(sort.property.clone()))?;

        if !keys.iter().any(|key| key.column == column) {
            let key = SortKey::new(column, sort.order);
            match nullable.iter().find(|(nullable_column, _)| *nullable_column == column) {
                Some((_, literal)) => keys.push(key.nulls_as(*literal)),
                None => keys.push(key),
            }
        }
    }

    if keys.is_empty() {
        keys.push(default);
    }
    if !keys.iter().any(|key| key.column == tie_breaker.column) {
        keys.push(tie_breaker);
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paging_query::SortOrder;

    const COLUMNS: &[(&str, &str)] = &[("name", "NAME"), ("taskName", "NAME"), ("size", "SIZE")];

    #[test]
    fn test_default_and_tie_breaker() {
        let request = PageRequest::new(0, 10).unwrap();
        let keys = sort_keys(&request, COLUMNS, &[], SortKey::desc("SIZE"), SortKey::asc("NAME")).unwrap();
        assert_eq!(keys, vec![SortKey::desc("SIZE"), SortKey::asc("NAME")]);
    }

    #[test]
    fn test_aliases_collapse_onto_one_column() {
        let request = PageRequest::new(0, 10)
            .unwrap()
            .with_sort("taskName", SortOrder::Desc)
            .with_sort("name", SortOrder::Asc);
        let keys = sort_keys(&request, COLUMNS, &[], SortKey::asc("NAME"), SortKey::asc("NAME")).unwrap();
        assert_eq!(keys, vec![SortKey::desc("NAME")]);
    }

    #[test]
    fn test_nullable_columns_get_null_substitute() {
        let request = PageRequest::new(0, 10)
            .unwrap()
            .with_sort("size", SortOrder::Asc);
        let keys = sort_keys(&request, COLUMNS, &[("SIZE", "-1")], SortKey::asc("NAME"), SortKey::asc("NAME")).unwrap();
        assert_eq!(
            keys,
            vec![SortKey::asc("SIZE").nulls_as("-1"), SortKey::asc("NAME")]
        );
    }

    #[test]
    fn test_unknown_property_rejected() {
        let request = PageRequest::new(0, 10).unwrap().with_sort("color", SortOrder::Asc);
        let result = sort_keys(&request, COLUMNS, &[], SortKey::asc("NAME"), SortKey::asc("NAME"));
        assert!(matches!(result, Err(StoreError::InvalidSortProperty(p)) if p == "color"));
    }
}
