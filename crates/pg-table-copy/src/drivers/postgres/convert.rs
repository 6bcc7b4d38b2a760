//! Conversion between PostgreSQL wire values and [`SqlValue`].

use std::error::Error;

use bytes::BytesMut;
use tokio_postgres::types::{to_sql_checked, FromSql, IsNull, ToSql, Type};
use tokio_postgres::Row;

use crate::core::value::{SqlNullType, SqlValue};
use crate::error::{DriverError, DriverResult};

type BoxError = Box<dyn Error + Sync + Send>;

/// A column's binary wire bytes, borrowed from the row without decoding.
struct WireBytes<'a>(&'a [u8]);

impl<'a> FromSql<'a> for WireBytes<'a> {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        Ok(WireBytes(raw))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

/// Convert every column of a row.
pub fn row_values(row: &Row) -> DriverResult<Vec<SqlValue>> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let raw: Option<WireBytes<'_>> = row.try_get(idx)?;
            decode_column(column.type_(), raw.map(|w| w.0)).map_err(|e| {
                DriverError::message(format!("reading column \"{}\": {}", column.name(), e))
            })
        })
        .collect()
}

/// Decode one column value according to its PostgreSQL type.
///
/// Types without a dedicated variant become [`SqlValue::Raw`] and are copied
/// byte for byte.
fn decode_column(ty: &Type, raw: Option<&[u8]>) -> Result<SqlValue, BoxError> {
    match ty.name() {
        "bool" => decode(ty, raw, SqlValue::Bool, SqlNullType::Bool),
        "int2" => decode(ty, raw, SqlValue::I16, SqlNullType::I16),
        "int4" => decode(ty, raw, SqlValue::I32, SqlNullType::I32),
        "int8" => decode(ty, raw, SqlValue::I64, SqlNullType::I64),
        "float4" => decode(ty, raw, SqlValue::F32, SqlNullType::F32),
        "float8" => decode(ty, raw, SqlValue::F64, SqlNullType::F64),
        "uuid" => decode(ty, raw, SqlValue::Uuid, SqlNullType::Uuid),
        "timestamp" => decode(ty, raw, SqlValue::DateTime, SqlNullType::DateTime),
        "timestamptz" => decode(ty, raw, SqlValue::DateTimeOffset, SqlNullType::DateTimeOffset),
        "date" => decode(ty, raw, SqlValue::Date, SqlNullType::Date),
        "time" => decode(ty, raw, SqlValue::Time, SqlNullType::Time),
        "bytea" => decode(ty, raw, SqlValue::Bytes, SqlNullType::Bytes),
        "numeric" => decode(ty, raw, SqlValue::Decimal, SqlNullType::Decimal),
        "json" | "jsonb" => decode(ty, raw, SqlValue::Json, SqlNullType::Json),
        _ if <String as FromSql<'_>>::accepts(ty) => {
            decode(ty, raw, SqlValue::Text, SqlNullType::String)
        }
        name => Ok(SqlValue::Raw {
            type_name: name.to_string(),
            bytes: raw.map(<[u8]>::to_vec),
        }),
    }
}

fn decode<'a, T, F>(
    ty: &Type,
    raw: Option<&'a [u8]>,
    wrap: F,
    null: SqlNullType,
) -> Result<SqlValue, BoxError>
where
    T: FromSql<'a>,
    F: FnOnce(T) -> SqlValue,
{
    let value = <Option<T> as FromSql<'a>>::from_sql_nullable(ty, raw)?;
    Ok(value.map(wrap).unwrap_or(SqlValue::Null(null)))
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        let name = self.type_name();
        match self {
            SqlValue::Null(_) => Ok(IsNull::Yes),
            SqlValue::Bool(v) => bind(v, name, ty, out),
            SqlValue::I16(v) => bind(v, name, ty, out),
            SqlValue::I32(v) => bind(v, name, ty, out),
            SqlValue::I64(v) => bind(v, name, ty, out),
            SqlValue::F32(v) => bind(v, name, ty, out),
            SqlValue::F64(v) => bind(v, name, ty, out),
            SqlValue::Text(v) => bind(v, name, ty, out),
            SqlValue::Bytes(v) => bind(v, name, ty, out),
            SqlValue::Uuid(v) => bind(v, name, ty, out),
            SqlValue::Decimal(v) => bind(v, name, ty, out),
            SqlValue::Json(v) => bind(v, name, ty, out),
            SqlValue::DateTime(v) => bind(v, name, ty, out),
            SqlValue::DateTimeOffset(v) => bind(v, name, ty, out),
            SqlValue::Date(v) => bind(v, name, ty, out),
            SqlValue::Time(v) => bind(v, name, ty, out),
            SqlValue::Raw { bytes: None, .. } => Ok(IsNull::Yes),
            // Matched by name: user-defined type OIDs differ between databases.
            SqlValue::Raw {
                type_name,
                bytes: Some(bytes),
            } => {
                if ty.name() != type_name.as_str() {
                    return Err(mismatch(type_name, ty));
                }
                out.extend_from_slice(bytes);
                Ok(IsNull::No)
            }
        }
    }

    // Each variant checks its own type in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Bind a value only if its Rust type encodes the column's PostgreSQL type.
fn bind<T: ToSql>(value: &T, name: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if !T::accepts(ty) {
        return Err(mismatch(name, ty));
    }
    value.to_sql(ty, out)
}

fn mismatch(name: &str, ty: &Type) -> BoxError {
    format!("cannot bind {} value to column of type {}", name, ty).into()
}
