//! Convenience re-exports for common PageHaus usage
//!
//! # Example
//!
//! ```rust
//! use pagehaus::prelude::*;
//! ```

// Core PageHaus components
pub use crate::core::PageHaus;
pub use crate::errors::PageHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, PagingConfig, PlatformConfig};

// Paging queries and page types
pub use paging_query::prelude::*;

// Repositories and readers
pub use task_store::prelude::*;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;

pub use sqlx::AnyPool;
