//! Typed interpretation of raw column default values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::types::JdbcType;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A default value parsed according to its column's type.
///
/// Two raw defaults that differ only in notation (`1.50` and `1.5`,
/// `'true'` and `1`) parse to the same value. Approximate defaults that
/// are both `NaN` are equal.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// Character data, kept verbatim.
    Text(String),
    /// Exact numeric, normalized (no trailing zeros).
    Decimal(Decimal),
    /// Approximate numeric.
    Float(f64),
    /// Boolean or bit.
    Boolean(bool),
    /// Date literal.
    Date(NaiveDate),
    /// Time literal.
    Time(NaiveTime),
    /// Timestamp literal.
    Timestamp(NaiveDateTime),
    /// Anything that is not a literal of the column type (for example
    /// `CURRENT_TIMESTAMP`), upper-cased.
    Expression(String),
}

impl DefaultValue {
    /// Parses `raw` as a default for a column of `jdbc_type`.
    #[must_use]
    pub fn parse(raw: &str, jdbc_type: JdbcType) -> Self {
        if jdbc_type.is_text() {
            return Self::Text(raw.to_string());
        }
        let literal = unquote(raw.trim());
        let parsed = match jdbc_type {
            JdbcType::TinyInt
            | JdbcType::SmallInt
            | JdbcType::Integer
            | JdbcType::BigInt
            | JdbcType::Numeric
            | JdbcType::Decimal => parse_decimal(literal).map(Self::Decimal),
            JdbcType::Real | JdbcType::Float | JdbcType::Double => {
                literal.parse::<f64>().ok().map(Self::Float)
            }
            JdbcType::Boolean | JdbcType::Bit => parse_bool(literal).map(Self::Boolean),
            JdbcType::Date => NaiveDate::parse_from_str(literal, DATE_FORMAT)
                .ok()
                .map(Self::Date),
            JdbcType::Time => TIME_FORMATS
                .iter()
                .find_map(|format| NaiveTime::parse_from_str(literal, format).ok())
                .map(Self::Time),
            JdbcType::Timestamp => TIMESTAMP_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(literal, format).ok())
                .map(Self::Timestamp),
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::Expression(raw.trim().to_ascii_uppercase()))
    }
}

impl PartialEq for DefaultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) | (Self::Expression(a), Self::Expression(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => {
                a.total_cmp(b).is_eq() || (a.is_nan() && b.is_nan())
            }
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    value
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
        .map(|d| d.normalize())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "t" | "y" | "yes" => Some(true),
        "false" | "0" | "f" | "n" | "no" => Some(false),
        _ => None,
    }
}
