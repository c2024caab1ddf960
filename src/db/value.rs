//! Parameter and result value types, and row normalization.
//!
//! [`SpParam`] is the closed set of scalars accepted as procedure arguments.
//! [`SqlValue`] is the decoded form of a result column; binary columns are
//! materialized as owned byte vectors so they stay valid after the producing
//! connection is closed. [`ResultRow`] maps column name to value, preserving
//! column order as insertion order.

use std::borrow::Cow;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tiberius::{ColumnData, FromSql, ToSql};

use crate::error::{DbError, DbResult};

/// A scalar procedure argument, positionally bound.
#[derive(Debug, Clone, PartialEq)]
pub enum SpParam {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl SpParam {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// `Text` for a present value, `Null` otherwise. Mirrors the optional
    /// form fields the registration procedures accept.
    pub fn opt_text(value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => Self::Text(v.into()),
            None => Self::Null,
        }
    }
}

impl From<i64> for SpParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SpParam {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SpParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl ToSql for SpParam {
    fn to_sql(&self) -> ColumnData<'_> {
        match self {
            Self::Null => ColumnData::String(None),
            Self::Int(v) => ColumnData::I64(Some(*v)),
            Self::Float(v) => ColumnData::F64(Some(*v)),
            Self::Text(v) => ColumnData::String(Some(Cow::Borrowed(v))),
        }
    }
}

/// A decoded result-column value.
///
/// Values pass through in the semantic type the engine returns; the only
/// conversion is that binary columns become owned byte vectors and all
/// integer widths widen to `i64`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Text(v) => serializer.serialize_str(v),
            Self::Bytes(v) => serializer.serialize_str(&STANDARD.encode(v)),
            Self::DateTime(v) => serializer.collect_str(v),
            Self::Date(v) => serializer.collect_str(v),
            Self::Time(v) => serializer.collect_str(v),
        }
    }
}

/// A normalized result row: column name -> value, in result-set order.
///
/// Column names keep the case the engine returned. If the result set carries
/// duplicate column names the last value wins and the first position is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultRow {
    columns: IndexMap<String, SqlValue>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, SqlValue)>) -> Self {
        let mut row = Self::new();
        for (name, value) in pairs {
            row.insert(name, value);
        }
        row
    }

    pub fn insert(&mut self, name: impl Into<String>, value: SqlValue) {
        self.columns.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(SqlValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(SqlValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(SqlValue::as_f64)
    }

    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        self.get(name).and_then(SqlValue::as_bytes)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.columns.values()
    }

    /// Consume the row in column order. The first value is the scalar
    /// position used by [`SpInvoker::call_scalar`](crate::db::SpInvoker).
    pub fn into_values(self) -> impl Iterator<Item = SqlValue> {
        self.columns.into_values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Decode a driver row into a [`ResultRow`].
///
/// Binary data is copied out of the row so the result owns its bytes.
pub fn normalize_row(row: &tiberius::Row) -> DbResult<ResultRow> {
    let mut normalized = ResultRow::new();
    for (column, data) in row.cells() {
        normalized.insert(column.name().to_string(), decode_cell(data)?);
    }
    Ok(normalized)
}

fn decode_cell(data: &ColumnData<'static>) -> DbResult<SqlValue> {
    let value = match data {
        ColumnData::U8(v) => v.map(|v| SqlValue::Int(v as i64)),
        ColumnData::I16(v) => v.map(|v| SqlValue::Int(v as i64)),
        ColumnData::I32(v) => v.map(|v| SqlValue::Int(v as i64)),
        ColumnData::I64(v) => v.map(SqlValue::Int),
        ColumnData::F32(v) => v.map(|v| SqlValue::Float(v as f64)),
        ColumnData::F64(v) => v.map(SqlValue::Float),
        ColumnData::Bit(v) => v.map(SqlValue::Bool),
        ColumnData::String(v) => v.as_ref().map(|v| SqlValue::Text(v.to_string())),
        ColumnData::Guid(v) => v.map(|v| SqlValue::Text(v.to_string())),
        ColumnData::Binary(v) => v.as_ref().map(|v| SqlValue::Bytes(v.to_vec())),
        ColumnData::Numeric(v) => {
            v.map(|n| SqlValue::Float((n.value() as f64) / 10f64.powi(n.scale() as i32)))
        }
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            NaiveDateTime::from_sql(data)
                .map_err(|e| DbError::internal(format!("datetime decode failed: {e}")))?
                .map(SqlValue::DateTime)
        }
        ColumnData::DateTimeOffset(_) => chrono::DateTime::<chrono::Utc>::from_sql(data)
            .map_err(|e| DbError::internal(format!("datetimeoffset decode failed: {e}")))?
            .map(|v| SqlValue::DateTime(v.naive_utc())),
        ColumnData::Date(_) => NaiveDate::from_sql(data)
            .map_err(|e| DbError::internal(format!("date decode failed: {e}")))?
            .map(SqlValue::Date),
        ColumnData::Time(_) => NaiveTime::from_sql(data)
            .map_err(|e| DbError::internal(format!("time decode failed: {e}")))?
            .map(SqlValue::Time),
        ColumnData::Xml(v) => v.as_ref().map(|v| SqlValue::Text(v.to_string())),
    };
    Ok(value.unwrap_or(SqlValue::Null))
}
