//! Result of a full-table read.

use super::value::SqlValue;

/// A row of column-aligned values.
pub type Row = Vec<SqlValue>;

/// Column names plus every row of a table, in the order the engine returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSnapshot {
    /// Column names in the table's natural order.
    pub columns: Vec<String>,
    /// Rows, each `columns.len()` wide.
    pub rows: Vec<Row>,
}

impl TableSnapshot {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the snapshot holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first row whose width differs from the column count.
    pub fn first_misaligned_row(&self) -> Option<usize> {
        let width = self.columns.len();
        self.rows.iter().position(|row| row.len() != width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_len() {
        let snapshot = TableSnapshot::new(
            vec!["id".to_string(), "amount".to_string()],
            vec![
                vec![SqlValue::I32(1), SqlValue::F64(9.99)],
                vec![SqlValue::I32(2), SqlValue::F64(4.50)],
            ],
        );
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.first_misaligned_row(), None);
    }

    #[test]
    fn test_misaligned_row_detected() {
        let snapshot = TableSnapshot::new(
            vec!["id".to_string(), "amount".to_string()],
            vec![vec![SqlValue::I32(1), SqlValue::F64(1.0)], vec![SqlValue::I32(2)]],
        );
        assert_eq!(snapshot.first_misaligned_row(), Some(1));
    }
}
