//! Conversions between [`Value`] and Postgres wire types.
//!
//! Columns of types without a dedicated [`Value`] variant still decode:
//! enums as `Text`, domains as their base type, anything else as the raw
//! binary payload in `Bytes`.

use crate::error::{QueryError, QueryResult};
use crate::row::Row;
use crate::value::Value;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type, WrongType};
use uuid::Uuid;

type BoxError = Box<dyn Error + Sync + Send>;

fn encode<T: ToSql>(value: &T, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if !T::accepts(ty) {
        return Err(Box::new(WrongType::new::<T>(ty.clone())));
    }
    value.to_sql(ty, out)
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => encode(b, ty, out),
            Value::Int(i) => match *ty {
                Type::INT2 => encode(&i16::try_from(*i)?, ty, out),
                Type::INT4 => encode(&i32::try_from(*i)?, ty, out),
                Type::FLOAT4 => encode(&(*i as f32), ty, out),
                Type::FLOAT8 => encode(&(*i as f64), ty, out),
                Type::NUMERIC => encode(&Decimal::from(*i), ty, out),
                _ => encode(i, ty, out),
            },
            Value::Float(f) => match *ty {
                Type::FLOAT4 => encode(&(*f as f32), ty, out),
                Type::NUMERIC => encode(&Decimal::try_from(*f)?, ty, out),
                _ => encode(f, ty, out),
            },
            Value::Decimal(d) => encode(d, ty, out),
            // Enum labels travel as their text in the binary format.
            Value::Text(s) if matches!(ty.kind(), Kind::Enum(_)) => {
                out.extend_from_slice(s.as_bytes());
                Ok(IsNull::No)
            }
            Value::Text(s) => encode(s, ty, out),
            Value::Bytes(b) => encode(b, ty, out),
            Value::Json(j) => encode(j, ty, out),
            Value::Uuid(u) => encode(u, ty, out),
            Value::Date(d) => encode(d, ty, out),
            Value::Timestamp(t) => encode(t, ty, out),
            Value::TimestampTz(t) => encode(t, ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // Checked per variant in `to_sql`.
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Undecoded column payload; accepts every column type.
struct RawValue<'a>(&'a [u8]);

impl<'a> FromSql<'a> for RawValue<'a> {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        Ok(RawValue(raw))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

/// Convert a driver row into a [`Row`].
pub(crate) fn decode_row(row: &tokio_postgres::Row) -> QueryResult<Row> {
    let mut out = Row::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, idx, column.type_())
            .map_err(|message| QueryError::decode(column.name(), message))?;
        out.push(column.name(), value);
    }
    Ok(out)
}

fn decode_column(row: &tokio_postgres::Row, idx: usize, ty: &Type) -> Result<Value, String> {
    match row
        .try_get::<_, Option<RawValue<'_>>>(idx)
        .map_err(|e| e.to_string())?
    {
        None => Ok(Value::Null),
        Some(RawValue(raw)) => decode_raw(ty, raw).map_err(|e| e.to_string()),
    }
}

fn decode_raw(ty: &Type, raw: &[u8]) -> Result<Value, BoxError> {
    let value = match *ty {
        Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
        Type::INT2 => Value::from(i16::from_sql(ty, raw)?),
        Type::INT4 => Value::from(i32::from_sql(ty, raw)?),
        Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
        Type::OID => Value::from(u32::from_sql(ty, raw)?),
        Type::FLOAT4 => Value::from(f32::from_sql(ty, raw)?),
        Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
        Type::NUMERIC => Value::Decimal(Decimal::from_sql(ty, raw)?),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            Value::Text(String::from_sql(ty, raw)?)
        }
        Type::BYTEA => Value::Bytes(raw.to_vec()),
        Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
        Type::UUID => Value::Uuid(Uuid::from_sql(ty, raw)?),
        Type::DATE => Value::Date(NaiveDate::from_sql(ty, raw)?),
        Type::TIMESTAMP => Value::Timestamp(NaiveDateTime::from_sql(ty, raw)?),
        Type::TIMESTAMPTZ => Value::TimestampTz(DateTime::<Utc>::from_sql(ty, raw)?),
        _ => match ty.kind() {
            Kind::Enum(_) => Value::Text(std::str::from_utf8(raw)?.to_string()),
            Kind::Domain(base) => decode_raw(base, raw)?,
            _ => Value::Bytes(raw.to_vec()),
        },
    };
    Ok(value)
}
