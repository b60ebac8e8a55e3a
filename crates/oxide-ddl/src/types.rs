//! Abstract column types.
//!
//! The abstract vocabulary mirrors the JDBC standard type codes. The
//! table of (code, name) pairs is fixed at compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A vendor-neutral column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JdbcType {
    /// Fixed-length character string.
    Char,
    /// Variable-length character string.
    Varchar,
    /// Long variable-length character string.
    LongVarchar,
    /// Exact numeric with precision and scale.
    Numeric,
    /// Exact decimal with precision and scale.
    Decimal,
    /// Boolean.
    Boolean,
    /// Single bit.
    Bit,
    /// 8-bit integer.
    TinyInt,
    /// 16-bit integer.
    SmallInt,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInt,
    /// Single precision floating point.
    Real,
    /// Floating point.
    Float,
    /// Double precision floating point.
    Double,
    /// Fixed-length binary.
    Binary,
    /// Variable-length binary.
    VarBinary,
    /// Long variable-length binary.
    LongVarBinary,
    /// Date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Character large object.
    Clob,
    /// Binary large object.
    Blob,
}

/// (type, JDBC code, canonical name) for every abstract type.
const TYPE_TABLE: &[(JdbcType, i32, &str)] = &[
    (JdbcType::Char, 1, "CHAR"),
    (JdbcType::Varchar, 12, "VARCHAR"),
    (JdbcType::LongVarchar, -1, "LONGVARCHAR"),
    (JdbcType::Numeric, 2, "NUMERIC"),
    (JdbcType::Decimal, 3, "DECIMAL"),
    (JdbcType::Boolean, 16, "BOOLEAN"),
    (JdbcType::Bit, -7, "BIT"),
    (JdbcType::TinyInt, -6, "TINYINT"),
    (JdbcType::SmallInt, 5, "SMALLINT"),
    (JdbcType::Integer, 4, "INTEGER"),
    (JdbcType::BigInt, -5, "BIGINT"),
    (JdbcType::Real, 7, "REAL"),
    (JdbcType::Float, 6, "FLOAT"),
    (JdbcType::Double, 8, "DOUBLE"),
    (JdbcType::Binary, -2, "BINARY"),
    (JdbcType::VarBinary, -3, "VARBINARY"),
    (JdbcType::LongVarBinary, -4, "LONGVARBINARY"),
    (JdbcType::Date, 91, "DATE"),
    (JdbcType::Time, 92, "TIME"),
    (JdbcType::Timestamp, 93, "TIMESTAMP"),
    (JdbcType::Clob, 2005, "CLOB"),
    (JdbcType::Blob, 2004, "BLOB"),
];

impl JdbcType {
    /// Every abstract type, in declaration order.
    pub const ALL: [Self; 22] = [
        Self::Char,
        Self::Varchar,
        Self::LongVarchar,
        Self::Numeric,
        Self::Decimal,
        Self::Boolean,
        Self::Bit,
        Self::TinyInt,
        Self::SmallInt,
        Self::Integer,
        Self::BigInt,
        Self::Real,
        Self::Float,
        Self::Double,
        Self::Binary,
        Self::VarBinary,
        Self::LongVarBinary,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::Clob,
        Self::Blob,
    ];

    fn entry(self) -> (JdbcType, i32, &'static str) {
        TYPE_TABLE[self as usize]
    }

    /// Returns the JDBC type code.
    #[must_use]
    pub fn code(self) -> i32 {
        self.entry().1
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.entry().2
    }

    /// Looks up a type by its JDBC code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        TYPE_TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(t, _, _)| *t)
    }

    /// Returns the promotion family of this type, if it has one.
    #[must_use]
    pub fn family(self) -> Option<TypeFamily> {
        TypeFamily::ALL
            .into_iter()
            .find(|family| family.members().contains(&self))
    }

    /// Whether values of this type are character data.
    #[must_use]
    pub fn is_text(self) -> bool {
        self.family() == Some(TypeFamily::Text)
    }
}

impl fmt::Display for JdbcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for JdbcType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TYPE_TABLE
            .iter()
            .find(|(_, _, name)| name.eq_ignore_ascii_case(wanted))
            .map(|(t, _, _)| *t)
            .ok_or_else(|| format!("unknown type '{wanted}'"))
    }
}

/// A group of types within which promotion is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    /// Character data.
    Text,
    /// Integers and fixed-point numbers.
    ExactNumeric,
    /// Floating point numbers.
    ApproximateNumeric,
    /// Binary data.
    Binary,
}

impl TypeFamily {
    /// Every family.
    pub const ALL: [Self; 4] = [
        Self::Text,
        Self::ExactNumeric,
        Self::ApproximateNumeric,
        Self::Binary,
    ];

    /// Members of the family, from narrowest to widest.
    #[must_use]
    pub fn members(self) -> &'static [JdbcType] {
        match self {
            Self::Text => &[
                JdbcType::Char,
                JdbcType::Varchar,
                JdbcType::LongVarchar,
                JdbcType::Clob,
            ],
            Self::ExactNumeric => &[
                JdbcType::TinyInt,
                JdbcType::SmallInt,
                JdbcType::Integer,
                JdbcType::BigInt,
                JdbcType::Numeric,
                JdbcType::Decimal,
            ],
            Self::ApproximateNumeric => &[JdbcType::Real, JdbcType::Float, JdbcType::Double],
            Self::Binary => &[
                JdbcType::Binary,
                JdbcType::VarBinary,
                JdbcType::LongVarBinary,
                JdbcType::Blob,
            ],
        }
    }

    /// Position of `jdbc_type` in the widening order.
    #[must_use]
    pub fn rank(self, jdbc_type: JdbcType) -> Option<usize> {
        self.members().iter().position(|t| *t == jdbc_type)
    }

    /// The type every member may fall back to, if the family has one.
    #[must_use]
    pub fn fallback(self) -> Option<JdbcType> {
        match self {
            Self::ExactNumeric => Some(JdbcType::Numeric),
            _ => None,
        }
    }

    /// Candidate types `jdbc_type` may be promoted to, in preference
    /// order. NUMERIC and DECIMAL are interchangeable at the top of the
    /// exact numeric family.
    #[must_use]
    pub fn promotion_candidates(self, jdbc_type: JdbcType) -> Vec<JdbcType> {
        let Some(rank) = self.rank(jdbc_type) else {
            return Vec::new();
        };
        let mut candidates: Vec<JdbcType> = self.members()[rank + 1..].to_vec();
        if let Some(fallback) = self.fallback() {
            if fallback != jdbc_type && !candidates.contains(&fallback) {
                candidates.push(fallback);
            }
        }
        candidates
    }

    /// Whether `to` is at or above `from` in this family.
    #[must_use]
    pub fn is_widening(self, from: JdbcType, to: JdbcType) -> bool {
        from == to || self.promotion_candidates(from).contains(&to)
    }
}
