/// Represents the type of SQL JOIN operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
        }
    }
}

/// Join condition (ON or USING)
#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    On {
        left_field: String,
        right_field: String,
    },
    Using(Vec<String>),
}

/// A JOIN appended to the FROM clause of a query specification
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub alias: Option<String>,
    pub condition: JoinCondition,
}

impl JoinClause {
    pub fn new_on(
        join_type: JoinType,
        table: impl Into<String>,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Self {
        Self {
            join_type,
            table: table.into(),
            alias: None,
            condition: JoinCondition::On {
                left_field: left_field.into(),
                right_field: right_field.into(),
            },
        }
    }

    pub fn new_using(join_type: JoinType, table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            join_type,
            table: table.into(),
            alias: None,
            condition: JoinCondition::Using(columns),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_sql(&self) -> String {
        let table_part = match &self.alias {
            Some(alias) => format!("{} {}", self.table, alias),
            None => self.table.clone(),
        };

        let condition_part = match &self.condition {
            JoinCondition::On {
                left_field,
                right_field,
            } => format!("ON {} = {}", left_field, right_field),
            JoinCondition::Using(columns) => format!("USING ({})", columns.join(", ")),
        };

        format!("{} {} {}", self.join_type.to_sql(), table_part, condition_part)
    }
}
