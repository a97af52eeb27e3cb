//! Typed rendering of result-set cells.
//!
//! The report only distinguishes the shapes the original schema can return,
//! so cells are reduced to a closed variant instead of being inspected
//! dynamically at every print site.

use chrono::{NaiveDateTime, Timelike};
use tiberius::{ColumnData, FromSql};

use crate::error::{MssqlError, MssqlResult};

/// A result-set cell reduced to the closed set of shapes the report renders.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// BIT.
    Bool(bool),
    /// Binary payloads, decoded as text at render time.
    Bytes(Vec<u8>),
    /// Datetime-ish columns.
    Timestamp(NaiveDateTime),
    /// Everything else, already in textual form.
    Other(String),
}

impl SqlValue {
    /// Build from a raw protocol cell.
    pub fn from_column_data(data: &ColumnData<'static>) -> MssqlResult<Self> {
        let value = match data {
            ColumnData::U8(v) => v.map_or(SqlValue::Null, |n| SqlValue::Other(n.to_string())),
            ColumnData::I16(v) => v.map_or(SqlValue::Null, |n| SqlValue::Other(n.to_string())),
            ColumnData::I32(v) => v.map_or(SqlValue::Null, |n| SqlValue::Other(n.to_string())),
            ColumnData::I64(v) => v.map_or(SqlValue::Null, |n| SqlValue::Other(n.to_string())),
            ColumnData::F32(v) => v.map_or(SqlValue::Null, |n| SqlValue::Other(n.to_string())),
            ColumnData::F64(v) => v.map_or(SqlValue::Null, |n| SqlValue::Other(n.to_string())),
            ColumnData::Bit(v) => v.map_or(SqlValue::Null, SqlValue::Bool),
            ColumnData::String(v) => v
                .as_deref()
                .map_or(SqlValue::Null, |s| SqlValue::Other(s.to_string())),
            ColumnData::Guid(v) => v.map_or(SqlValue::Null, |g| SqlValue::Other(g.to_string())),
            ColumnData::Binary(v) => v
                .as_deref()
                .map_or(SqlValue::Null, |b| SqlValue::Bytes(b.to_vec())),
            ColumnData::Numeric(v) => v
                .as_ref()
                .map_or(SqlValue::Null, |n| SqlValue::Other(n.to_string())),
            ColumnData::Xml(v) => v
                .as_deref()
                .map_or(SqlValue::Null, |x| SqlValue::Other(x.to_string())),
            ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
                match NaiveDateTime::from_sql(data)
                    .map_err(|e| MssqlError::type_conversion(e.to_string()))?
                {
                    Some(ts) => SqlValue::Timestamp(ts),
                    None => SqlValue::Null,
                }
            }
            ColumnData::DateTimeOffset(_) => {
                match chrono::DateTime::<chrono::Utc>::from_sql(data)
                    .map_err(|e| MssqlError::type_conversion(e.to_string()))?
                {
                    Some(ts) => SqlValue::Timestamp(ts.naive_utc()),
                    None => SqlValue::Null,
                }
            }
            ColumnData::Date(_) => {
                match chrono::NaiveDate::from_sql(data)
                    .map_err(|e| MssqlError::type_conversion(e.to_string()))?
                {
                    Some(d) => SqlValue::Other(d.to_string()),
                    None => SqlValue::Null,
                }
            }
            ColumnData::Time(_) => {
                match chrono::NaiveTime::from_sql(data)
                    .map_err(|e| MssqlError::type_conversion(e.to_string()))?
                {
                    Some(t) => SqlValue::Other(t.to_string()),
                    None => SqlValue::Null,
                }
            }
        };

        Ok(value)
    }

    /// Render for the tab-separated dump.
    pub fn render(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(true) => "1".to_string(),
            SqlValue::Bool(false) => "0".to_string(),
            SqlValue::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            SqlValue::Timestamp(ts) => format_timestamp(ts),
            SqlValue::Other(text) => text.clone(),
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS.fff` with trailing zeros, and a bare trailing dot,
/// trimmed away.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    let base = ts.format("%Y-%m-%d %H:%M:%S").to_string();
    let millis = ts.nanosecond() / 1_000_000;
    if millis == 0 {
        return base;
    }

    let fraction = format!("{millis:03}");
    format!("{base}.{}", fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::borrow::Cow;

    fn timestamp(millis: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 5, 10)
            .unwrap()
            .and_hms_milli_opt(17, 14, 30, millis)
            .unwrap()
    }

    #[test]
    fn test_render_null_and_bool() {
        assert_eq!(SqlValue::Null.render(), "NULL");
        assert_eq!(SqlValue::Bool(true).render(), "1");
        assert_eq!(SqlValue::Bool(false).render(), "0");
    }

    #[test]
    fn test_render_bytes_as_text() {
        assert_eq!(SqlValue::Bytes(b"hello".to_vec()).render(), "hello");
    }

    #[test]
    fn test_timestamp_trims_trailing_zeros() {
        assert_eq!(
            SqlValue::Timestamp(timestamp(0)).render(),
            "2016-05-10 17:14:30"
        );
        assert_eq!(
            SqlValue::Timestamp(timestamp(500)).render(),
            "2016-05-10 17:14:30.5"
        );
        assert_eq!(
            SqlValue::Timestamp(timestamp(120)).render(),
            "2016-05-10 17:14:30.12"
        );
        assert_eq!(
            SqlValue::Timestamp(timestamp(123)).render(),
            "2016-05-10 17:14:30.123"
        );
    }

    #[test]
    fn test_from_column_data_scalars() {
        let value = SqlValue::from_column_data(&ColumnData::I32(Some(42))).unwrap();
        assert_eq!(value, SqlValue::Other("42".to_string()));

        let value = SqlValue::from_column_data(&ColumnData::Bit(Some(true))).unwrap();
        assert_eq!(value, SqlValue::Bool(true));

        let value =
            SqlValue::from_column_data(&ColumnData::String(Some(Cow::Borrowed("abc")))).unwrap();
        assert_eq!(value, SqlValue::Other("abc".to_string()));

        let value =
            SqlValue::from_column_data(&ColumnData::Binary(Some(Cow::Borrowed(&b"xy"[..]))))
                .unwrap();
        assert_eq!(value, SqlValue::Bytes(b"xy".to_vec()));
    }

    #[test]
    fn test_from_column_data_nulls() {
        for data in [
            ColumnData::I32(None),
            ColumnData::Bit(None),
            ColumnData::String(None),
            ColumnData::Binary(None),
        ] {
            assert_eq!(SqlValue::from_column_data(&data).unwrap(), SqlValue::Null);
        }
    }
}
