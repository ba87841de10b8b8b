//! Database migration functionality
//!
//! Creates the task definition and task execution tables the repositories
//! page over. Column types stay within what every supported database and
//! the sqlx `Any` driver understand, so timestamps are stored as RFC 3339 text.

use crate::core::PageHaus;
use crate::errors::PageHausError;
use paging_query::DatabaseType;
use task_store::{TASK_DEFINITIONS_TABLE, TASK_EXECUTION_PARAMS_TABLE, TASK_EXECUTION_TABLE};

impl PageHaus {
    /// Create the task tables and indexes if they do not exist.
    /// If recreate is true, drops existing tables first
    pub async fn migrate(&self, recreate: bool) -> Result<(), PageHausError> {
        if recreate {
            for table in [
                TASK_EXECUTION_PARAMS_TABLE,
                TASK_EXECUTION_TABLE,
                TASK_DEFINITIONS_TABLE,
            ] {
                let drop_sql = format!("DROP TABLE IF EXISTS {}", table);
                crate::debug_log!("Dropping table with SQL: {}", drop_sql);
                sqlx::query(&drop_sql).execute(self.pool()).await?;
            }
        }

        for create_table_sql in create_tables_sql() {
            crate::debug_log!("Creating table with SQL: {}", create_table_sql);
            sqlx::query(&create_table_sql).execute(self.pool()).await?;
        }

        if let Some(index_sql) = create_index_sql(self.database_type()) {
            crate::debug_log!("Creating index with SQL: {}", index_sql);
            sqlx::query(&index_sql).execute(self.pool()).await?;
        }

        Ok(())
    }
}

fn create_tables_sql() -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                DEFINITION_NAME VARCHAR(255) NOT NULL PRIMARY KEY,
                DEFINITION TEXT NOT NULL,
                DESCRIPTION VARCHAR(255)
            )",
            TASK_DEFINITIONS_TABLE
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                TASK_EXECUTION_ID BIGINT NOT NULL PRIMARY KEY,
                TASK_NAME VARCHAR(100),
                START_TIME VARCHAR(32),
                END_TIME VARCHAR(32),
                EXIT_CODE BIGINT,
                EXIT_MESSAGE VARCHAR(2500),
                ERROR_MESSAGE VARCHAR(2500),
                LAST_UPDATED VARCHAR(32),
                EXTERNAL_EXECUTION_ID VARCHAR(255),
                PARENT_EXECUTION_ID BIGINT
            )",
            TASK_EXECUTION_TABLE
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                TASK_EXECUTION_ID BIGINT NOT NULL,
                TASK_PARAM VARCHAR(2500)
            )",
            TASK_EXECUTION_PARAMS_TABLE
        ),
    ]
}

/// MySQL and MariaDB have no `CREATE INDEX IF NOT EXISTS` in every supported version
fn create_index_sql(database: DatabaseType) -> Option<String> {
    match database {
        DatabaseType::MySql | DatabaseType::MariaDb => None,
        _ => Some(format!(
            "CREATE INDEX IF NOT EXISTS IDX_TASK_EXECUTION_NAME ON {} (TASK_NAME)",
            TASK_EXECUTION_TABLE
        )),
    }
}
