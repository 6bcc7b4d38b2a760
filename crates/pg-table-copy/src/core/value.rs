//! Per-cell SQL value representation.
//!
//! Rows move from the source connection to the target connection as vectors
//! of [`SqlValue`], so each cell keeps the type it was read with and is bound
//! back with that same type.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Type hint carried by NULL values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlNullType {
    Bool,
    I16,
    I32,
    I64,
    F32,
    F64,
    String,
    Bytes,
    Uuid,
    Decimal,
    Json,
    DateTime,
    DateTimeOffset,
    Date,
    Time,
    /// Any type carried as undecoded wire bytes.
    Raw,
}

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL with the type of the column it was read from.
    Null(SqlNullType),

    Bool(bool),

    /// smallint
    I16(i16),

    /// integer
    I32(i32),

    /// bigint
    I64(i64),

    /// real
    F32(f32),

    /// double precision
    F64(f64),

    /// text, varchar, char and other string-like types.
    Text(String),

    /// bytea
    Bytes(Vec<u8>),

    Uuid(Uuid),

    /// numeric
    Decimal(Decimal),

    /// json / jsonb
    Json(serde_json::Value),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),

    /// Timestamp with timezone offset.
    DateTimeOffset(DateTime<FixedOffset>),

    Date(NaiveDate),

    Time(NaiveTime),

    /// A value of a type with no dedicated variant (arrays, enums, interval,
    /// inet, money and so on), kept as its binary wire encoding. `None` is
    /// NULL. It binds only to a column whose type has the same name.
    Raw {
        type_name: String,
        bytes: Option<Vec<u8>>,
    },
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null(_) | SqlValue::Raw { bytes: None, .. })
    }

    /// Get the SqlNullType for this value.
    #[must_use]
    pub fn null_type(&self) -> SqlNullType {
        match self {
            SqlValue::Null(t) => *t,
            SqlValue::Bool(_) => SqlNullType::Bool,
            SqlValue::I16(_) => SqlNullType::I16,
            SqlValue::I32(_) => SqlNullType::I32,
            SqlValue::I64(_) => SqlNullType::I64,
            SqlValue::F32(_) => SqlNullType::F32,
            SqlValue::F64(_) => SqlNullType::F64,
            SqlValue::Text(_) => SqlNullType::String,
            SqlValue::Bytes(_) => SqlNullType::Bytes,
            SqlValue::Uuid(_) => SqlNullType::Uuid,
            SqlValue::Decimal(_) => SqlNullType::Decimal,
            SqlValue::Json(_) => SqlNullType::Json,
            SqlValue::DateTime(_) => SqlNullType::DateTime,
            SqlValue::DateTimeOffset(_) => SqlNullType::DateTimeOffset,
            SqlValue::Date(_) => SqlNullType::Date,
            SqlValue::Time(_) => SqlNullType::Time,
            SqlValue::Raw { .. } => SqlNullType::Raw,
        }
    }

    /// Short name of the carried type, for error messages.
    pub fn type_name(&self) -> &str {
        if let SqlValue::Raw { type_name, .. } = self {
            return type_name;
        }
        match self.null_type() {
            SqlNullType::Bool => "bool",
            SqlNullType::I16 => "int2",
            SqlNullType::I32 => "int4",
            SqlNullType::I64 => "int8",
            SqlNullType::F32 => "float4",
            SqlNullType::F64 => "float8",
            SqlNullType::String => "text",
            SqlNullType::Bytes => "bytea",
            SqlNullType::Uuid => "uuid",
            SqlNullType::Decimal => "numeric",
            SqlNullType::Json => "json",
            SqlNullType::DateTime => "timestamp",
            SqlNullType::DateTimeOffset => "timestamptz",
            SqlNullType::Date => "date",
            SqlNullType::Time => "time",
            SqlNullType::Raw => "raw",
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::I16(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::F32(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        SqlValue::Json(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

impl From<DateTime<FixedOffset>> for SqlValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        SqlValue::DateTimeOffset(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}
