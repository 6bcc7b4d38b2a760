//! Database driver implementations.
//!
//! - [`postgres`]: PostgreSQL connector and connection
//! - [`common`]: shared utilities (TLS)

pub mod common;
pub mod postgres;

pub use common::{SslMode, TlsBuilder};
pub use postgres::{PgConnection, PgConnector};
