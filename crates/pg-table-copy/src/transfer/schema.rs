//! Column-set comparison between source and destination.

use crate::error::{CopyError, Result};

/// Require the two column sequences to be identical: same length, same
/// names, same order.
///
/// Values are bound positionally, so a reordered destination would silently
/// put data in the wrong columns. Declared types are not compared.
pub fn validate(source_columns: &[String], target_columns: &[String]) -> Result<()> {
    if source_columns == target_columns {
        return Ok(());
    }
    Err(CopyError::SchemaMismatch {
        source_columns: source_columns.to_vec(),
        target_columns: target_columns.to_vec(),
    })
}
