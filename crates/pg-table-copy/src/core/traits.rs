//! Connection abstractions used by the copy pipeline.
//!
//! - [`Connector`]: opens a connection for a resolved environment profile
//! - [`Connection`]: one open, authenticated database session
//!
//! The pipeline only depends on these traits; the PostgreSQL implementation
//! lives in `drivers::postgres`, and tests substitute an in-memory fake.

use async_trait::async_trait;

use crate::config::EnvironmentProfile;
use crate::error::DriverResult;

use super::snapshot::TableSnapshot;
use super::value::SqlValue;

/// One open database session.
///
/// Transactions are explicit: [`Connection::begin`] starts one,
/// [`Connection::commit`] or [`Connection::rollback`] ends it. Statements run
/// through [`Connection::execute`] outside a transaction autocommit.
#[async_trait]
pub trait Connection: Send {
    /// Run a query in a read-only transaction and fetch every row.
    async fn query(&mut self, sql: &str) -> DriverResult<TableSnapshot>;

    /// Return the result column names of `sql` without executing it.
    async fn describe(&mut self, sql: &str) -> DriverResult<Vec<String>>;

    /// Start a transaction.
    async fn begin(&mut self) -> DriverResult<()>;

    /// Execute a parameterized statement, returning the affected row count.
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> DriverResult<u64>;

    /// Commit the open transaction.
    async fn commit(&mut self) -> DriverResult<()>;

    /// Roll back the open transaction.
    async fn rollback(&mut self) -> DriverResult<()>;

    /// Close the session. Consumes the connection so it cannot be closed twice.
    async fn close(self: Box<Self>) -> DriverResult<()>;
}

/// Opens connections from resolved profiles.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open an encrypted connection to the profile's database.
    async fn open(&self, profile: &EnvironmentProfile) -> DriverResult<Box<dyn Connection>>;
}
