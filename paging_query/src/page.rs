//! Page requests and paged results
//!
//! [`PageRequest`] is what a list endpoint receives (`page`, `size`, `sort`
//! query parameters). [`Page`] is what a repository returns, and
//! [`PagedModel`] is its HAL rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::PagingError;
use crate::query_spec::SortOrder;

/// Defaults applied when parsing request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefaults {
    pub default_size: i64,
    pub max_size: i64,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 2000,
        }
    }
}

/// A requested sort on an API property name (not a column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortProperty {
    pub property: String,
    pub order: SortOrder,
}

impl SortProperty {
    pub fn new(property: impl Into<String>, order: SortOrder) -> Self {
        Self {
            property: property.into(),
            order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
    sort: Vec<SortProperty>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: PageDefaults::default().default_size,
            sort: Vec::new(),
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Result<Self, PagingError> {
        if page < 0 {
            return Err(PagingError::InvalidArgument(format!(
                "page number must not be negative, got {}",
                page
            )));
        }
        if size <= 0 {
            return Err(PagingError::page_size(size));
        }
        if page.checked_mul(size).is_none() {
            return Err(PagingError::InvalidArgument(format!(
                "page {} of size {} is out of range",
                page, size
            )));
        }

        Ok(Self {
            page,
            size,
            sort: Vec::new(),
        })
    }

    pub fn with_sort(mut self, property: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push(SortProperty::new(property, order));
        self
    }

    /// Parse `page`, `size` and `sort` request parameters.
    ///
    /// Missing or negative pages fall back to 0, missing or non-positive
    /// sizes to the default, and sizes above the maximum are capped. Each
    /// `sort` value is `property[,property...][,ASC|DESC]`.
    pub fn from_params(
        page: Option<&str>,
        size: Option<&str>,
        sort: &[&str],
        defaults: PageDefaults,
    ) -> Result<Self, PagingError> {
        let page = match page {
            Some(raw) => parse_number("page", raw)?.max(0),
            None => 0,
        };
        let size = match size {
            Some(raw) => parse_number("size", raw)?,
            None => defaults.default_size,
        };
        let size = if size <= 0 {
            defaults.default_size
        } else {
            size.min(defaults.max_size)
        };

        let mut request = Self::new(page, size)?;
        for value in sort {
            request.sort.extend(parse_sort(value)?);
        }
        Ok(request)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn sort(&self) -> &[SortProperty] {
        &self.sort
    }

    /// Absolute index of the first item on this page
    pub fn offset(&self) -> i64 {
        self.page * self.size
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

fn parse_number(name: &str, raw: &str) -> Result<i64, PagingError> {
    raw.trim().parse().map_err(|_| {
        PagingError::InvalidArgument(format!("{} must be an integer, got '{}'", name, raw))
    })
}

fn parse_sort(value: &str) -> Result<Vec<SortProperty>, PagingError> {
    let mut tokens: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let order = match tokens.last().map(|t| t.parse::<SortOrder>()) {
        Some(Ok(order)) => {
            tokens.pop();
            order
        }
        _ => SortOrder::Asc,
    };

    if tokens.is_empty() && !value.trim().is_empty() {
        return Err(PagingError::InvalidArgument(format!(
            "sort '{}' names no property",
            value
        )));
    }

    Ok(tokens
        .into_iter()
        .map(|property| SortProperty::new(property, order))
        .collect())
}

/// Page numbers and totals as rendered under `page`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub number: i64,
}

impl PageMetadata {
    pub fn new(request: &PageRequest, total_elements: i64) -> Self {
        let total_elements = total_elements.max(0);
        let total_pages = (total_elements + request.size - 1) / request.size;
        Self {
            size: request.size,
            total_elements,
            total_pages,
            number: request.page,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    content: Vec<T>,
    metadata: PageMetadata,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        Self {
            content,
            metadata: PageMetadata::new(request, total_elements),
        }
    }

    pub fn from_parts(content: Vec<T>, metadata: PageMetadata) -> Self {
        Self { content, metadata }
    }

    pub fn empty(request: &PageRequest, total_elements: i64) -> Self {
        Self::new(Vec::new(), request, total_elements)
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn metadata(&self) -> &PageMetadata {
        &self.metadata
    }

    pub fn total_elements(&self) -> i64 {
        self.metadata.total_elements
    }

    pub fn has_next(&self) -> bool {
        self.metadata.number + 1 < self.metadata.total_pages
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            metadata: self.metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// HAL envelope for a page of resources:
/// `{"_embedded": {"<relation>": [..]}, "_links": {..}, "page": {..}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedModel<T> {
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    embedded: Option<BTreeMap<String, Vec<T>>>,
    #[serde(rename = "_links")]
    links: BTreeMap<String, Link>,
    page: PageMetadata,
}

impl<T> PagedModel<T> {
    /// Build the model with `self`, plus `prev`/`next` where they exist.
    /// `base_href` is the collection URL without paging parameters.
    pub fn new(page: Page<T>, relation: &str, base_href: &str) -> Self {
        let metadata = page.metadata;
        let mut links = BTreeMap::new();
        links.insert(
            "self".to_string(),
            Link::new(page_href(base_href, metadata.number, metadata.size)),
        );
        if metadata.number > 0 {
            links.insert(
                "prev".to_string(),
                Link::new(page_href(base_href, metadata.number - 1, metadata.size)),
            );
        }
        if page.has_next() {
            links.insert(
                "next".to_string(),
                Link::new(page_href(base_href, metadata.number + 1, metadata.size)),
            );
        }

        let embedded = if page.content.is_empty() {
            None
        } else {
            let mut embedded = BTreeMap::new();
            embedded.insert(relation.to_string(), page.content);
            Some(embedded)
        };

        Self {
            embedded,
            links,
            page: metadata,
        }
    }

    pub fn content(&self, relation: &str) -> &[T] {
        self.embedded
            .as_ref()
            .and_then(|embedded| embedded.get(relation))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel)
    }

    pub fn metadata(&self) -> &PageMetadata {
        &self.page
    }
}

fn page_href(base_href: &str, page: i64, size: i64) -> String {
    let separator = if base_href.contains('?') { '&' } else { '?' };
    format!("{}{}page={}&size={}", base_href, separator, page, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_request_validation() {
        assert_eq!(PageRequest::new(2, 10).unwrap().offset(), 20);
        assert!(matches!(
            PageRequest::new(-1, 10),
            Err(PagingError::InvalidArgument(_))
        ));
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(PagingError::InvalidArgument(_))
        ));
        assert!(PageRequest::new(i64::MAX, 2).is_err());
    }

    #[test]
    fn test_from_params_defaults_and_caps() {
        let defaults = PageDefaults::default();

        let request = PageRequest::from_params(None, None, &[], defaults).unwrap();
        assert_eq!((request.page(), request.size()), (0, 20));

        let request = PageRequest::from_params(Some("-3"), Some("5000"), &[], defaults).unwrap();
        assert_eq!((request.page(), request.size()), (0, 2000));

        let request = PageRequest::from_params(Some("1"), Some("0"), &[], defaults).unwrap();
        assert_eq!((request.page(), request.size()), (1, 20));

        assert!(matches!(
            PageRequest::from_params(Some("first"), None, &[], defaults),
            Err(PagingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sort_parameter_parsing() {
        let request = PageRequest::from_params(
            Some("0"),
            Some("10"),
            &["taskName,ASC", "description,dslText,desc", "name"],
            PageDefaults::default(),
        )
        .unwrap();

        assert_eq!(
            request.sort(),
            &[
                SortProperty::new("taskName", SortOrder::Asc),
                SortProperty::new("description", SortOrder::Desc),
                SortProperty::new("dslText", SortOrder::Desc),
                SortProperty::new("name", SortOrder::Asc),
            ]
        );

        assert!(PageRequest::from_params(None, None, &[",DESC"], PageDefaults::default()).is_err());
        assert!(matches!(
            PageRequest::from_params(None, None, &["DESC"], PageDefaults::default()),
            Err(PagingError::InvalidArgument(_))
        ));
        assert!(PageRequest::from_params(None, None, &["asc,"], PageDefaults::default()).is_err());
    }

    #[test]
    fn test_page_metadata_arithmetic() {
        let request = PageRequest::new(1, 10).unwrap();
        assert_eq!(
            PageMetadata::new(&request, 25),
            PageMetadata {
                size: 10,
                total_elements: 25,
                total_pages: 3,
                number: 1,
            }
        );
        assert_eq!(PageMetadata::new(&request, 0).total_pages, 0);
        assert_eq!(PageMetadata::new(&request, 30).total_pages, 3);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let request = PageRequest::new(0, 2).unwrap();
        let page = Page::new(vec![1, 2], &request, 5).map(|n| n * 10);

        assert_eq!(page.content(), &[10, 20]);
        assert_eq!(page.total_elements(), 5);
        assert!(page.has_next());
    }

    #[test]
    fn test_paged_model_serializes_hal_shape() {
        let request = PageRequest::new(1, 2).unwrap();
        let page = Page::new(vec![json!({"name": "a"}), json!({"name": "b"})], &request, 5);
        let model = PagedModel::new(page, "taskDefinitionResourceList", "http://localhost:9393/tasks/definitions");

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(
            value["_embedded"]["taskDefinitionResourceList"][1]["name"],
            json!("b")
        );
        assert_eq!(
            value["_links"]["self"]["href"],
            json!("http://localhost:9393/tasks/definitions?page=1&size=2")
        );
        assert_eq!(
            value["_links"]["next"]["href"],
            json!("http://localhost:9393/tasks/definitions?page=2&size=2")
        );
        assert_eq!(
            value["page"],
            json!({"size": 2, "totalElements": 5, "totalPages": 3, "number": 1})
        );
    }

    #[test]
    fn test_empty_page_omits_embedded() {
        let request = PageRequest::new(0, 20).unwrap();
        let model: PagedModel<String> =
            PagedModel::new(Page::empty(&request, 0), "items", "/tasks/definitions?taskName=x");

        let value = serde_json::to_value(&model).unwrap();
        assert!(value.get("_embedded").is_none());
        assert_eq!(
            value["_links"]["self"]["href"],
            json!("/tasks/definitions?taskName=x&page=0&size=20")
        );
        assert!(model.link("prev").is_none());
        assert!(model.content("items").is_empty());
    }
}
