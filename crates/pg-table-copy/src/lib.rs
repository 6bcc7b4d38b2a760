//! # pg-table-copy
//!
//! Copy one table between two PostgreSQL environments.
//!
//! Both environments are named sections of a YAML configuration store. A
//! copy resolves both profiles, checks they point at the same table, opens
//! one TLS connection to each side, reads the whole source table, requires
//! the destination to have the identical column sequence, and appends every
//! row in a single transaction. Both connections are always closed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pg_table_copy::{ConfigStore, CopyOrchestrator, PgConnector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = ConfigStore::load("db_config.yaml")?;
//!     let orchestrator = CopyOrchestrator::new(Arc::new(store), Arc::new(PgConnector::new()));
//!     let result = orchestrator.run("qa", "staging").await?;
//!     println!("Inserted {} rows", result.rows_inserted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod transfer;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use config::{ConfigResolver, ConfigStore, EnvironmentProfile, DEFAULT_CONFIG_FILE};
pub use crate::core::{Connection, Connector, Row, SqlNullType, SqlValue, TableRef, TableSnapshot};
pub use drivers::{PgConnection, PgConnector, SslMode};
pub use error::{CopyError, CopyFailure, CopyStage, DriverError, Result, Side, EXIT_RUNTIME_ERROR};
pub use events::{CopyEvent, CopyReporter, TracingReporter};
pub use orchestrator::{CopyOrchestrator, CopyResult};
