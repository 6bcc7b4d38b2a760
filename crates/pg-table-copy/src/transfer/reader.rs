//! Full-table reads.

use tracing::debug;

use crate::core::identifier::TableRef;
use crate::core::snapshot::TableSnapshot;
use crate::core::traits::Connection;
use crate::error::{CopyError, DriverError, Result};

/// Build the wildcard scan for a table.
///
/// Columns are never enumerated: the column order returned is the table's
/// natural order, which is what the schema comparison relies on.
pub fn select_all_sql(table: &TableRef) -> String {
    format!("SELECT * FROM {}", table.qualified())
}

/// Read every row of `table` in a read-only transaction.
pub async fn read_all(conn: &mut dyn Connection, table: &TableRef) -> Result<TableSnapshot> {
    let sql = select_all_sql(table);
    let snapshot = conn
        .query(&sql)
        .await
        .map_err(|e| CopyError::read(table.to_string(), e))?;

    if let Some(idx) = snapshot.first_misaligned_row() {
        return Err(CopyError::read(
            table.to_string(),
            DriverError::message(format!(
                "row {} has {} values for {} columns",
                idx,
                snapshot.rows[idx].len(),
                snapshot.columns.len()
            )),
        ));
    }

    debug!(
        "Read {} rows, {} columns from {}",
        snapshot.len(),
        snapshot.columns.len(),
        table
    );
    Ok(snapshot)
}

/// Column names of `table` in natural order, without fetching rows.
pub async fn read_columns(conn: &mut dyn Connection, table: &TableRef) -> Result<Vec<String>> {
    let sql = select_all_sql(table);
    conn.describe(&sql)
        .await
        .map_err(|e| CopyError::read(table.to_string(), e))
}
