//! Cell values and column data types.
//!
//! A [`CellValue`] is the dynamically typed content of one grid cell. Every
//! filter operand and every value stored in a column cache is a `CellValue`.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// Datetime layouts accepted when a text value is read as a date.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The content of a single grid cell.
///
/// Serialized as a plain scalar (`null`, string, number or boolean) so filter
/// definitions read naturally in JSON and TOML. Datetimes serialize as ISO
/// text and enum members as their name; deserializing text applies the same
/// date detection as [`CellValue::from_json`].
///
/// # Examples
///
/// ```
/// use gridfilter_model::models::CellValue;
///
/// let v = CellValue::from(42.0);
/// assert_eq!(v.as_f64(), Some(42.0));
/// assert_eq!(v.to_string(), "42");
///
/// let t = CellValue::text("12.5");
/// assert_eq!(t.as_f64(), Some(12.5));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value.
    #[default]
    Null,
    /// Free text.
    Text(String),
    /// Any numeric value, widened to `f64`.
    Number(f64),
    /// A boolean flag.
    Boolean(bool),
    /// A date or datetime without zone.
    DateTime(NaiveDateTime),
    /// A named member of an enumeration.
    Enum(String),
}

impl CellValue {
    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Creates a datetime value at midnight of the given date.
    pub fn date(date: NaiveDate) -> Self {
        CellValue::DateTime(date.and_time(NaiveTime::MIN))
    }

    /// Returns true for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns true for null, empty text and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the natural data type of this value, or `None` for null.
    pub fn data_type(&self) -> Option<ColumnDataType> {
        match self {
            CellValue::Null => None,
            CellValue::Text(_) => Some(ColumnDataType::String),
            CellValue::Number(_) => Some(ColumnDataType::Number),
            CellValue::Boolean(_) => Some(ColumnDataType::Boolean),
            CellValue::DateTime(_) => Some(ColumnDataType::DateTime),
            CellValue::Enum(_) => Some(ColumnDataType::Enum),
        }
    }

    /// Reads the value as a finite number.
    ///
    /// Text is parsed after trimming; booleans map to 1 and 0. NaN and
    /// infinities are rejected so numeric comparisons stay total.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Reads the value as a datetime, parsing text in the common ISO layouts.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Text(s) => parse_datetime(s.trim()),
            _ => None,
        }
    }

    /// Reads the value as a calendar date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        self.as_datetime().map(|dt| dt.date())
    }

    /// Reads the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            CellValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            CellValue::Number(n) if *n == 0.0 => Some(false),
            CellValue::Number(n) if *n == 1.0 => Some(true),
            _ => None,
        }
    }

    /// Converts the value into the representation used by columns of `data_type`.
    ///
    /// Returns `None` when the value cannot be represented; null always converts
    /// to null.
    pub fn convert_to(&self, data_type: ColumnDataType) -> Option<CellValue> {
        if self.is_null() {
            return Some(CellValue::Null);
        }
        match data_type {
            ColumnDataType::String => Some(match self {
                CellValue::Text(_) => self.clone(),
                other => CellValue::Text(other.to_string()),
            }),
            ColumnDataType::Number => self.as_f64().map(CellValue::Number),
            ColumnDataType::DateTime => self.as_datetime().map(CellValue::DateTime),
            ColumnDataType::Boolean => self.as_bool().map(CellValue::Boolean),
            ColumnDataType::Enum => Some(match self {
                CellValue::Enum(_) => self.clone(),
                other => CellValue::Enum(other.to_string()),
            }),
        }
    }

    /// Like [`CellValue::convert_to`], reporting failure as a [`ModelError`].
    pub fn try_convert_to(&self, data_type: ColumnDataType) -> crate::error::Result<CellValue> {
        self.convert_to(data_type)
            .ok_or_else(|| ModelError::conversion(self, data_type))
    }

    /// Builds a cell value from a JSON value.
    ///
    /// Strings holding an ISO date or datetime become [`CellValue::DateTime`].
    /// Arrays and objects are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Boolean(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(CellValue::Null, CellValue::Number),
            serde_json::Value::String(s) => match parse_datetime(s) {
                Some(dt) => CellValue::DateTime(dt),
                None => CellValue::Text(s.clone()),
            },
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Parses a datetime or a bare date.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(s) | CellValue::Enum(s) => f.write_str(s),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::DateTime(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Text(s) | CellValue::Enum(s) => serializer.serialize_str(s),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Boolean(b) => serializer.serialize_bool(*b),
            CellValue::DateTime(dt) => {
                serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
        }
    }
}

struct CellValueVisitor;

impl<'de> Visitor<'de> for CellValueVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, a string, a number or a boolean")
    }

    fn visit_unit<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<CellValue, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<CellValue, E> {
        Ok(CellValue::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CellValue, E> {
        Ok(CellValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CellValue, E> {
        Ok(CellValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CellValue, E> {
        Ok(CellValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CellValue, E> {
        Ok(match parse_datetime(v) {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Text(v.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::date(d)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Null, Into::into)
    }
}

/// Coarse classification of a column's values.
///
/// Selects which search types are offered for a column and how its distinct
/// values are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDataType {
    /// Free text (the fallback for mixed columns).
    String,
    /// Numeric values.
    Number,
    /// Dates and datetimes.
    DateTime,
    /// Booleans.
    Boolean,
    /// Enumeration members.
    Enum,
}

impl ColumnDataType {
    /// All data types, in declaration order.
    pub const ALL: [ColumnDataType; 5] = [
        ColumnDataType::String,
        ColumnDataType::Number,
        ColumnDataType::DateTime,
        ColumnDataType::Boolean,
        ColumnDataType::Enum,
    ];

    /// Lower-case name used in configuration files and CLI flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnDataType::String => "string",
            ColumnDataType::Number => "number",
            ColumnDataType::DateTime => "date_time",
            ColumnDataType::Boolean => "boolean",
            ColumnDataType::Enum => "enum",
        }
    }
}

impl fmt::Display for ColumnDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
