//! PostgreSQL driver.
//!
//! - [`PgConnector`]: opens TLS connections from environment profiles
//! - [`PgConnection`]: the session used for reads and transactional inserts

mod connection;
mod convert;

pub use connection::{PgConnection, PgConnector};
