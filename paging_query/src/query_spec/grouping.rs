use super::filter::QueryFilter;

/// Represents a GROUP BY clause with optional HAVING conditions
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    /// Fields to group by
    pub fields: Vec<String>,
    /// Optional HAVING conditions for filtering grouped results
    pub having: Option<Vec<QueryFilter>>,
}

impl GroupBy {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            having: None,
        }
    }

    pub fn single(field: impl Into<String>) -> Self {
        Self {
            fields: vec![field.into()],
            having: None,
        }
    }

    pub fn with_having(mut self, conditions: Vec<QueryFilter>) -> Self {
        self.having = Some(conditions);
        self
    }

    pub fn having(mut self, condition: QueryFilter) -> Self {
        match &mut self.having {
            Some(conditions) => conditions.push(condition),
            None => self.having = Some(vec![condition]),
        }
        self
    }

    /// A group-by without fields renders nothing and never triggers grouped paging
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_having(&self) -> bool {
        self.having
            .as_ref()
            .map(|h| !h.is_empty())
            .unwrap_or(false)
    }
}
