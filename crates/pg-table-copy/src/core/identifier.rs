//! Identifier validation and quoting for dynamically built SQL.
//!
//! Table and column names cannot be bound as statement parameters, so every
//! identifier that reaches SQL text is validated and double-quoted here.
//! Quoting also makes names case-sensitive: `Orders` and `orders` are
//! different tables.

use std::fmt;

use crate::error::{CopyError, Result};

/// PostgreSQL truncates identifiers longer than this (NAMEDATALEN - 1).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate an identifier taken from configuration.
///
/// Rejects empty identifiers, identifiers containing NUL bytes, and
/// identifiers PostgreSQL would silently truncate.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CopyError::ConfigInvalid(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(CopyError::ConfigInvalid(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(CopyError::ConfigInvalid(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a PostgreSQL identifier, doubling embedded double quotes.
pub fn quote_pg(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A possibly schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: Option<String>, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
        }
    }

    /// Quoted form for use in SQL text.
    pub fn qualified(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", quote_pg(schema), quote_pg(&self.name)),
            None => quote_pg(&self.name),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}
