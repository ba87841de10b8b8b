/// SQL aggregate functions usable in a select list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    /// COUNT(DISTINCT field)
    CountDistinct,
}

impl AggregateFunction {
    pub fn to_sql(&self) -> &'static str {
        match self {
            AggregateFunction::Count | AggregateFunction::CountDistinct => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }

    pub fn is_distinct(&self) -> bool {
        matches!(self, AggregateFunction::CountDistinct)
    }
}

/// One entry of a SELECT list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectField {
    /// SELECT *
    All,
    /// SELECT field_name
    Field(String),
    /// SELECT field_name AS alias
    FieldWithAlias { field: String, alias: String },
    /// SELECT COUNT(field) [AS alias]
    Aggregate {
        function: AggregateFunction,
        field: Option<String>, // None for COUNT(*)
        alias: Option<String>,
    },
}

impl SelectField {
    pub fn field(field: impl Into<String>) -> Self {
        SelectField::Field(field.into())
    }

    pub fn field_as(field: impl Into<String>, alias: impl Into<String>) -> Self {
        SelectField::FieldWithAlias {
            field: field.into(),
            alias: alias.into(),
        }
    }

    pub fn count_all() -> Self {
        SelectField::Aggregate {
            function: AggregateFunction::Count,
            field: None,
            alias: None,
        }
    }

    pub fn count(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Count, field)
    }

    pub fn count_distinct(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::CountDistinct, field)
    }

    pub fn sum(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Sum, field)
    }

    pub fn avg(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Avg, field)
    }

    pub fn min(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Min, field)
    }

    pub fn max(field: impl Into<String>) -> Self {
        Self::aggregate(AggregateFunction::Max, field)
    }

    /// Attach an alias to an aggregate or plain field; `*` is returned unchanged
    pub fn with_alias(self, alias: impl Into<String>) -> Self {
        match self {
            SelectField::Aggregate {
                function, field, ..
            } => SelectField::Aggregate {
                function,
                field,
                alias: Some(alias.into()),
            },
            SelectField::Field(field) => SelectField::FieldWithAlias {
                field,
                alias: alias.into(),
            },
            other => other,
        }
    }

    fn aggregate(function: AggregateFunction, field: impl Into<String>) -> Self {
        SelectField::Aggregate {
            function,
            field: Some(field.into()),
            alias: None,
        }
    }

    pub fn to_sql(&self) -> String {
        match self {
            SelectField::All => "*".to_string(),
            SelectField::Field(name) => name.clone(),
            SelectField::FieldWithAlias { field, alias } => format!("{} AS {}", field, alias),
            SelectField::Aggregate {
                function,
                field,
                alias,
            } => {
                let argument = match (function.is_distinct(), field) {
                    (true, Some(f)) => format!("DISTINCT {}", f),
                    (_, Some(f)) => f.clone(),
                    (_, None) => "*".to_string(),
                };
                let aggregate = format!("{}({})", function.to_sql(), argument);

                match alias {
                    Some(alias) => format!("{} AS {}", aggregate, alias),
                    None => aggregate,
                }
            }
        }
    }
}
