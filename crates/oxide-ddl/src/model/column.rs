use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};
use crate::types::JdbcType;

use super::default_value::DefaultValue;
use super::names_equal;

/// Schema definition for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Abstract type.
    #[serde(rename = "type")]
    pub jdbc_type: JdbcType,
    /// Native type selected by a type mapper, if the column was mapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_type: Option<String>,
    /// Size or precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Scale, for exact numeric types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Whether this column is part of the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether the column is NOT NULL.
    #[serde(default)]
    pub required: bool,
    /// Whether the database generates the value on insert.
    #[serde(default)]
    pub auto_increment: bool,
    /// Raw default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Column {
    /// Creates a new nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, jdbc_type: JdbcType) -> Self {
        Self {
            name: name.into(),
            jdbc_type,
            native_type: None,
            size: None,
            scale: None,
            primary_key: false,
            required: false,
            auto_increment: false,
            default_value: None,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the column as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.required = true;
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the scale.
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the raw default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets size and scale from a `"N"` or `"N,S"` specification.
    pub fn with_size_spec(mut self, spec: &str) -> Result<Self> {
        let invalid = || DdlError::InvalidSize {
            column: self.name.clone(),
            spec: spec.to_string(),
        };
        let mut parts = spec.split(',').map(str::trim);
        let size = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(invalid)?
            .parse::<u64>()
            .map_err(|_| invalid())?;
        let scale = match parts.next() {
            Some(s) => Some(s.parse::<u32>().map_err(|_| invalid())?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        self.size = Some(size);
        self.scale = scale;
        Ok(self)
    }

    /// Returns the JDBC type code.
    #[must_use]
    pub fn type_code(&self) -> i32 {
        self.jdbc_type.code()
    }

    /// Returns the default value parsed according to the column type.
    #[must_use]
    pub fn parsed_default(&self) -> Option<DefaultValue> {
        self.default_value
            .as_deref()
            .map(|raw| DefaultValue::parse(raw, self.jdbc_type))
    }

    /// Whether both columns describe the same structure. The native type
    /// is a mapping detail and is ignored; defaults are compared parsed.
    #[must_use]
    pub fn same_structure(&self, other: &Self, case_sensitive: bool) -> bool {
        names_equal(&self.name, &other.name, case_sensitive)
            && self.jdbc_type == other.jdbc_type
            && self.size == other.size
            && self.scale == other.scale
            && self.primary_key == other.primary_key
            && self.required == other.required
            && self.auto_increment == other.auto_increment
            && self.parsed_default() == other.parsed_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder() {
        let col = Column::new("id", JdbcType::Integer)
            .primary_key()
            .auto_increment();

        assert!(col.primary_key);
        assert!(col.required);
        assert!(col.auto_increment);
        assert_eq!(col.type_code(), 4);
    }

    #[test]
    fn test_size_spec() {
        let col = Column::new("price", JdbcType::Decimal)
            .with_size_spec("15, 2")
            .unwrap();
        assert_eq!(col.size, Some(15));
        assert_eq!(col.scale, Some(2));

        let col = Column::new("name", JdbcType::Varchar)
            .with_size_spec("80")
            .unwrap();
        assert_eq!(col.size, Some(80));
        assert_eq!(col.scale, None);
    }

    #[test]
    fn test_invalid_size_spec() {
        for spec in ["", "abc", "10,x", "1,2,3"] {
            let result = Column::new("c", JdbcType::Decimal).with_size_spec(spec);
            assert!(
                matches!(result, Err(DdlError::InvalidSize { .. })),
                "spec {spec:?}"
            );
        }
    }

    #[test]
    fn test_parsed_default() {
        let col = Column::new("amount", JdbcType::Numeric).default_value("2.50");
        assert_eq!(
            col.parsed_default(),
            Some(DefaultValue::parse("2.5", JdbcType::Numeric))
        );
        assert_eq!(Column::new("x", JdbcType::Integer).parsed_default(), None);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let col: Column =
            serde_json::from_str(r#"{"name": "title", "type": "VARCHAR", "size": 120}"#).unwrap();
        assert_eq!(col.jdbc_type, JdbcType::Varchar);
        assert_eq!(col.size, Some(120));
        assert!(!col.required);
        assert!(col.native_type.is_none());
    }
}
