//! Transactional bulk insert.

use tracing::{debug, warn};

use crate::core::identifier::{quote_pg, TableRef};
use crate::core::snapshot::Row;
use crate::core::traits::Connection;
use crate::core::value::SqlValue;
use crate::error::{CopyError, DriverError, DriverResult, Result};

/// Maximum bind parameters PostgreSQL accepts in one statement.
pub const MAX_BIND_PARAMS: usize = 65_535;

/// Rows that fit in one INSERT statement for a table of `ncols` columns.
pub fn rows_per_statement(ncols: usize) -> usize {
    (MAX_BIND_PARAMS / ncols.max(1)).max(1)
}

/// Build `INSERT INTO t ("a", "b") VALUES ($1, $2), ($3, $4), ...`.
pub fn build_insert_sql(table: &TableRef, columns: &[String], nrows: usize) -> String {
    let col_list = columns
        .iter()
        .map(|c| quote_pg(c))
        .collect::<Vec<_>>()
        .join(", ");

    let ncols = columns.len();
    let tuples = (0..nrows)
        .map(|r| {
            let placeholders = (1..=ncols)
                .map(|c| format!("${}", r * ncols + c))
                .collect::<Vec<_>>()
                .join(", ");
            format!("({})", placeholders)
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        table.qualified(),
        col_list,
        tuples
    )
}

/// Insert every row in one transaction.
///
/// Zero rows returns `Ok(0)` without opening a transaction. An empty column
/// list, or rows whose width differs from `columns`, are rejected before
/// anything is sent. Any failure
/// after BEGIN rolls back; a failing rollback is logged and the original
/// error is returned.
pub async fn write_all(
    conn: &mut dyn Connection,
    table: &TableRef,
    columns: &[String],
    rows: &[Row],
) -> Result<u64> {
    if rows.is_empty() {
        return Ok(0);
    }

    if columns.is_empty() {
        return Err(CopyError::write(
            table.to_string(),
            DriverError::message(format!("{} rows to insert but no columns", rows.len())),
        ));
    }

    if let Some((idx, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != columns.len())
    {
        return Err(CopyError::write(
            table.to_string(),
            DriverError::message(format!(
                "row {} has {} values for {} columns",
                idx,
                row.len(),
                columns.len()
            )),
        ));
    }

    conn.begin()
        .await
        .map_err(|e| CopyError::write(table.to_string(), e))?;

    match insert_chunks(conn, table, columns, rows).await {
        Ok(inserted) => match conn.commit().await {
            Ok(()) => {
                debug!("Committed {} rows into {}", inserted, table);
                Ok(inserted)
            }
            Err(e) => {
                rollback_quietly(conn, table).await;
                Err(CopyError::write(table.to_string(), e))
            }
        },
        Err(e) => {
            rollback_quietly(conn, table).await;
            Err(CopyError::write(table.to_string(), e))
        }
    }
}

async fn insert_chunks(
    conn: &mut dyn Connection,
    table: &TableRef,
    columns: &[String],
    rows: &[Row],
) -> DriverResult<u64> {
    let mut inserted = 0u64;
    for chunk in rows.chunks(rows_per_statement(columns.len())) {
        let sql = build_insert_sql(table, columns, chunk.len());
        let params: Vec<SqlValue> = chunk.iter().flat_map(|r| r.iter().cloned()).collect();
        inserted += conn.execute(&sql, &params).await?;
    }
    Ok(inserted)
}

async fn rollback_quietly(conn: &mut dyn Connection, table: &TableRef) {
    if let Err(e) = conn.rollback().await {
        warn!("Rollback on {} failed: {}", table, e);
    }
}
