//! # PageHaus
//!
//! Dialect-specific paging queries for MySQL, MariaDB, PostgreSQL, SQLite and
//! friends, plus paged task definition and task execution repositories built
//! on top of them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagehaus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pagehaus = PageHaus::new(DatabaseConfig::sqlite_in_memory()).await?;
//!     pagehaus.migrate(false).await?;
//!
//!     let definitions = pagehaus.task_definitions();
//!     definitions
//!         .save(TaskDefinition::new("timestamp-task", "timestamp --format=yyyy"))
//!         .await?;
//!
//!     let request = pagehaus.page_request(Some("0"), Some("10"), &["taskName,ASC"])?;
//!     let model = pagehaus
//!         .list_task_definitions(&request, None, "http://localhost:9393/tasks/definitions")
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&model)?);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::PageHaus;
pub use errors::PageHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, PagingConfig, PlatformConfig};

// Re-export the workspace crates
pub use paging_query;
pub use task_store;

// Re-export external dependencies used in public API
pub use sqlx;
pub use async_trait;
