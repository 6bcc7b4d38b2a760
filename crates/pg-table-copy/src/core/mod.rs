//! Core abstractions for the copy pipeline.
//!
//! - [`identifier`]: identifier validation and quoting
//! - [`snapshot`]: the result of a full-table read
//! - [`traits`]: connection and connector traits
//! - [`value`]: per-cell SQL values

pub mod identifier;
pub mod snapshot;
pub mod traits;
pub mod value;

pub use identifier::TableRef;
pub use snapshot::{Row, TableSnapshot};
pub use traits::{Connection, Connector};
pub use value::{SqlNullType, SqlValue};
