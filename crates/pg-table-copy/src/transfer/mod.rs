//! The three data steps of a copy.
//!
//! - [`reader`]: full scan of the source table and column discovery
//! - [`schema`]: strict column-sequence comparison
//! - [`writer`]: chunked multi-row INSERT inside one transaction
//!
//! Every step works against `&mut dyn Connection`, so the pipeline can be
//! driven by the PostgreSQL driver or an in-memory fake.

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::{read_all, read_columns, select_all_sql};
pub use schema::validate as validate_schema;
pub use writer::{build_insert_sql, rows_per_statement, write_all, MAX_BIND_PARAMS};
