use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PagingError;

/// Databases with a paging dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    MariaDb,
    MySql,
    Postgres,
    Sqlite,
    H2,
    SqlServer,
    Db2,
    Oracle,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 8] = [
        DatabaseType::MariaDb,
        DatabaseType::MySql,
        DatabaseType::Postgres,
        DatabaseType::Sqlite,
        DatabaseType::H2,
        DatabaseType::SqlServer,
        DatabaseType::Db2,
        DatabaseType::Oracle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DatabaseType::MariaDb => "mariadb",
            DatabaseType::MySql => "mysql",
            DatabaseType::Postgres => "postgres",
            DatabaseType::Sqlite => "sqlite",
            DatabaseType::H2 => "h2",
            DatabaseType::SqlServer => "sqlserver",
            DatabaseType::Db2 => "db2",
            DatabaseType::Oracle => "oracle",
        }
    }

    /// Resolve from the product name a driver reports for its connection,
    /// e.g. `"MariaDB"`, `"Microsoft SQL Server"` or `"DB2/LINUXX8664"`
    pub fn from_product_name(product_name: &str) -> Result<Self, PagingError> {
        let name = product_name.trim();
        let upper = name.to_ascii_uppercase();

        let database = match upper.as_str() {
            "MARIADB" => DatabaseType::MariaDb,
            "MYSQL" => DatabaseType::MySql,
            "POSTGRESQL" => DatabaseType::Postgres,
            "SQLITE" => DatabaseType::Sqlite,
            "H2" => DatabaseType::H2,
            "MICROSOFT SQL SERVER" => DatabaseType::SqlServer,
            "ORACLE" => DatabaseType::Oracle,
            _ if upper == "DB2" || upper.starts_with("DB2/") => DatabaseType::Db2,
            _ => return Err(PagingError::UnsupportedDatabase(name.to_string())),
        };

        Ok(database)
    }

    /// Resolve from the scheme of a connection URL (`jdbc:` prefixes are accepted)
    pub fn from_url(url: &str) -> Result<Self, PagingError> {
        let url = url.trim();
        let url = url.strip_prefix("jdbc:").unwrap_or(url);
        let scheme = url
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| PagingError::UnsupportedDatabase(url.to_string()))?;

        scheme.parse()
    }
}

impl FromStr for DatabaseType {
    type Err = PagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mariadb" => Ok(DatabaseType::MariaDb),
            "mysql" => Ok(DatabaseType::MySql),
            "postgres" | "postgresql" => Ok(DatabaseType::Postgres),
            "sqlite" => Ok(DatabaseType::Sqlite),
            "h2" => Ok(DatabaseType::H2),
            "sqlserver" | "mssql" => Ok(DatabaseType::SqlServer),
            "db2" => Ok(DatabaseType::Db2),
            "oracle" => Ok(DatabaseType::Oracle),
            other => Err(PagingError::UnsupportedDatabase(other.to_string())),
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
