//! Dynamically typed cell values
//!
//! Cells arrive as strings when records come from CSV files, but may already
//! be typed when records are built in code or converted from JSON. [`Value`]
//! is the common currency: what fields receive and what they return.
//!
//! Equality and hashing are cross-numeric: `Int(1)`, `Float(1.0)` and
//! `Decimal(1)` are the same key. Uniqueness tracking and domain lookups
//! depend on this.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;

use crate::decimal::Decimal;

/// String values interpreted as blank cells.
///
/// This is the token list `pandas.read_csv` treats as missing, with a few
/// additions seen in the wild.
pub const NA_VALUES: &[&str] = &[
    "",
    "#N/A",
    "#N/A N/A",
    "#NA",
    "-1.#IND",
    "-1.#QNAN",
    "-NaN",
    "-nan",
    "1.#IND",
    "1.#QNAN",
    "N/A",
    "NA",
    "NULL",
    "NaN",
    "n/a",
    "nan",
    "null",
    "N.A.",
    "N.A",
];

/// Check whether a (already trimmed) string is one of the blank-cell tokens
#[must_use]
pub fn is_na(s: &str) -> bool {
    NA_VALUES.contains(&s)
}

/// A dynamically typed cell value
#[derive(Debug, Clone)]
pub enum Value {
    /// Blank cell
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Double-precision float
    Float(f64),
    /// Fixed-point decimal
    Decimal(Decimal),
    /// String
    Str(String),
    /// Date and time, without timezone
    Timestamp(NaiveDateTime),
    /// List of values
    Array(Vec<Value>),
}

impl Value {
    /// True for blank cells: `Null`, NaN floats and NaN-marked decimals.
    ///
    /// Arrays are never null, even when empty.
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// The string slice, if this is a string value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, if it has one
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Decimal(d) => Some(d.to_f64()),
            _ => None,
        }
    }

    /// True for `Int`, `Float` and `Decimal` values
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_) | Self::Decimal(_))
    }

    /// Canonical comparison key.
    ///
    /// Numerics with an exact integer value collapse onto that integer, so
    /// `Int(1)`, `Float(1.0)` and `Decimal(1)` compare and hash alike.
    fn key(&self) -> Key<'_> {
        match self {
            Self::Null => Key::Null,
            Self::Bool(b) => Key::Bool(*b),
            Self::Int(i) => Key::Integral(i128::from(*i)),
            Self::Float(f) => float_key(*f),
            Self::Decimal(d) => d.to_i128().map_or_else(|| float_key(d.to_f64()), Key::Integral),
            Self::Str(s) => Key::Str(s),
            Self::Timestamp(t) => Key::Timestamp(*t),
            Self::Array(items) => Key::Array(items),
        }
    }
}

/// Largest f64 magnitude that converts to i128 without saturating
const MAX_EXACT_INT: f64 = 1.7e38;

fn float_key(f: f64) -> Key<'static> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INT {
        #[allow(clippy::cast_possible_truncation)]
        let exact = f as i128;
        Key::Integral(exact)
    } else {
        Key::Bits(f.to_bits())
    }
}

#[derive(PartialEq)]
enum Key<'a> {
    Null,
    Bool(bool),
    Integral(i128),
    Bits(u64),
    Str(&'a str),
    Timestamp(NaiveDateTime),
    Array(&'a [Value]),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.key() {
            Key::Null => state.write_u8(0),
            Key::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            },
            Key::Integral(i) => {
                state.write_u8(2);
                i.hash(state);
            },
            Key::Bits(b) => {
                state.write_u8(3);
                b.hash(state);
            },
            Key::Str(s) => {
                state.write_u8(4);
                s.hash(state);
            },
            Key::Timestamp(t) => {
                state.write_u8(5);
                t.hash(state);
            },
            Key::Array(items) => {
                state.write_u8(6);
                for item in items {
                    item.hash(state);
                }
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(t: NaiveDateTime) -> Self {
        Self::Timestamp(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Into::into).collect())
            },
            // Objects flatten to an array of [key, value] pairs
            serde_json::Value::Object(map) => Self::Array(
                map.into_iter()
                    .map(|(k, v)| Self::Array(vec![Self::Str(k), v.into()]))
                    .collect(),
            ),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(v: toml::Value) -> Self {
        match v {
            toml::Value::String(s) => Self::Str(s),
            toml::Value::Integer(i) => Self::Int(i),
            toml::Value::Float(f) => Self::Float(f),
            toml::Value::Boolean(b) => Self::Bool(b),
            toml::Value::Datetime(dt) => Self::Str(dt.to_string()),
            toml::Value::Array(items) => Self::Array(items.into_iter().map(Into::into).collect()),
            toml::Value::Table(table) => Self::Array(
                table
                    .into_iter()
                    .map(|(k, v)| Self::Array(vec![Self::Str(k), v.into()]))
                    .collect(),
            ),
        }
    }
}
