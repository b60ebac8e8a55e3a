//! Native type registry.
//!
//! Each platform registers the native types it supports and the
//! mappings from abstract types onto them. The registry is populated
//! once and read-only afterwards.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{DdlError, Result};
use crate::types::JdbcType;

/// A native database type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeType {
    /// SQL name.
    pub name: String,
    /// Maximum size or precision; `0` means unbounded.
    pub size: u64,
    /// Minimum scale, for types with a scale.
    pub min_scale: Option<u32>,
    /// Maximum scale, for types with a scale.
    pub max_scale: Option<u32>,
}

impl NativeType {
    /// Creates a native type without scale.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            min_scale: None,
            max_scale: None,
        }
    }

    /// Sets the scale range.
    #[must_use]
    pub fn with_scale(mut self, min_scale: u32, max_scale: u32) -> Self {
        self.min_scale = Some(min_scale);
        self.max_scale = Some(max_scale);
        self
    }

    /// Whether the type has no size limit.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.size == 0
    }

    /// Size limit, with unbounded types as the largest possible value.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        if self.is_unbounded() {
            u64::MAX
        } else {
            self.size
        }
    }
}

/// How a mapping renders the size of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeFormat {
    /// Never renders a size.
    #[default]
    None,
    /// Renders `(N)` when N > 1.
    Size,
    /// Renders `(N)` or `(N, S)` when N > 0.
    SizeScale,
}

/// Association of an abstract type with a native type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mapping {
    /// Abstract type.
    pub jdbc_type: JdbcType,
    /// Native type name.
    pub native_type: String,
    /// Size rendering.
    pub format: SizeFormat,
}

impl Mapping {
    /// Creates a mapping.
    #[must_use]
    pub fn new(jdbc_type: JdbcType, native_type: impl Into<String>, format: SizeFormat) -> Self {
        Self {
            jdbc_type,
            native_type: native_type.into(),
            format,
        }
    }

    /// Creates a mapping that renders no size.
    #[must_use]
    pub fn plain(jdbc_type: JdbcType, native_type: impl Into<String>) -> Self {
        Self::new(jdbc_type, native_type, SizeFormat::None)
    }

    /// Creates a mapping that renders `(N)`.
    #[must_use]
    pub fn sized(jdbc_type: JdbcType, native_type: impl Into<String>) -> Self {
        Self::new(jdbc_type, native_type, SizeFormat::Size)
    }

    /// Creates a mapping that renders `(N, S)`.
    #[must_use]
    pub fn size_scale(jdbc_type: JdbcType, native_type: impl Into<String>) -> Self {
        Self::new(jdbc_type, native_type, SizeFormat::SizeScale)
    }
}

/// A resolved native type paired with the mapping that selected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    /// The resolved native type.
    pub native: NativeType,
    /// The mapping that selected it.
    pub mapping: Mapping,
    /// The size that was asked for.
    pub requested_size: Option<u64>,
}

impl TypeMapping {
    /// Abstract type of the selecting mapping.
    #[must_use]
    pub fn jdbc_type(&self) -> JdbcType {
        self.mapping.jdbc_type
    }

    /// Native type name.
    #[must_use]
    pub fn native_name(&self) -> &str {
        &self.native.name
    }

    /// Whether the native type can hold `size`.
    #[must_use]
    pub fn can_hold(&self, size: Option<u64>) -> bool {
        size.map_or(true, |s| self.native.capacity() >= s)
    }

    /// The requested size capped at the native size.
    #[must_use]
    pub fn effective_size(&self) -> Option<u64> {
        match self.requested_size {
            Some(size) if !self.native.is_unbounded() => Some(size.min(self.native.size)),
            other => other,
        }
    }

    /// Renders the native type with size and scale.
    #[must_use]
    pub fn render(&self, scale: Option<u32>) -> String {
        let name = &self.native.name;
        match (self.mapping.format, self.effective_size()) {
            (SizeFormat::Size, Some(size)) if size > 1 => format!("{name}({size})"),
            (SizeFormat::SizeScale, Some(size)) if size > 0 => match scale {
                Some(scale) => format!("{name}({size}, {scale})"),
                None => format!("{name}({size})"),
            },
            _ => name.clone(),
        }
    }
}

impl fmt::Display for TypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

/// Per-platform store of native types and mappings.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, NativeType>,
    mappings: HashMap<JdbcType, Vec<Mapping>>,
    auto_increment_mappings: HashMap<JdbcType, Vec<Mapping>>,
    auto_increment_order: Vec<JdbcType>,
}

fn type_key(name: &str) -> String {
    name.to_ascii_uppercase()
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a native type, replacing any type of the same name.
    pub fn add_type(&mut self, native: NativeType) {
        self.types.insert(type_key(&native.name), native);
    }

    /// Registers a native type read from database metadata. An existing
    /// type of the same name is only replaced by one at least as large.
    pub fn add_type_from_metadata(&mut self, native: NativeType) {
        let key = type_key(&native.name);
        if let Some(existing) = self.types.get(&key) {
            if existing.capacity() > native.capacity() {
                trace!(
                    native_type = %native.name,
                    kept = existing.size,
                    offered = native.size,
                    "Keeping larger native type"
                );
                return;
            }
        }
        self.types.insert(key, native);
    }

    /// Looks up a native type by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&NativeType> {
        self.types.get(&type_key(name))
    }

    fn check_native(&self, mapping: &Mapping) -> Result<()> {
        if self.get_type(&mapping.native_type).is_none() {
            return Err(DdlError::Configuration {
                abstract_type: mapping.jdbc_type.to_string(),
                native_type: mapping.native_type.clone(),
            });
        }
        Ok(())
    }

    /// Registers an ordinary mapping.
    pub fn add_mapping(&mut self, mapping: Mapping) -> Result<()> {
        self.check_native(&mapping)?;
        self.mappings
            .entry(mapping.jdbc_type)
            .or_default()
            .push(mapping);
        Ok(())
    }

    /// Registers a mapping usable for auto-increment columns.
    pub fn add_auto_increment_mapping(&mut self, mapping: Mapping) -> Result<()> {
        self.check_native(&mapping)?;
        if !self.auto_increment_order.contains(&mapping.jdbc_type) {
            self.auto_increment_order.push(mapping.jdbc_type);
        }
        self.auto_increment_mappings
            .entry(mapping.jdbc_type)
            .or_default()
            .push(mapping);
        Ok(())
    }

    /// Ordinary mappings registered for `jdbc_type`, in registration order.
    #[must_use]
    pub fn mappings_for(&self, jdbc_type: JdbcType) -> &[Mapping] {
        self.mappings.get(&jdbc_type).map_or(&[], Vec::as_slice)
    }

    /// Auto-increment mappings registered for `jdbc_type`.
    #[must_use]
    pub fn auto_increment_mappings_for(&self, jdbc_type: JdbcType) -> &[Mapping] {
        self.auto_increment_mappings
            .get(&jdbc_type)
            .map_or(&[], Vec::as_slice)
    }

    /// Whether any auto-increment mapping is registered.
    #[must_use]
    pub fn has_auto_increment_mappings(&self) -> bool {
        !self.auto_increment_order.is_empty()
    }

    /// Abstract types with auto-increment mappings, in registration order.
    #[must_use]
    pub fn auto_increment_type_names(&self) -> &[JdbcType] {
        &self.auto_increment_order
    }

    /// Best ordinary mapping for `jdbc_type` at `size`.
    #[must_use]
    pub fn get_type_mapping(&self, jdbc_type: JdbcType, size: Option<u64>) -> Option<TypeMapping> {
        self.best_mapping(self.mappings_for(jdbc_type), size)
    }

    /// Best auto-increment mapping for `jdbc_type` at `size`.
    #[must_use]
    pub fn get_auto_increment_mapping(
        &self,
        jdbc_type: JdbcType,
        size: Option<u64>,
    ) -> Option<TypeMapping> {
        self.best_mapping(self.auto_increment_mappings_for(jdbc_type), size)
    }

    /// Picks the mapping whose native size fits `size` best.
    ///
    /// An exact size wins immediately. Otherwise the smallest type that
    /// still holds `size` is preferred, falling back to the largest type
    /// when none is big enough. Ties keep the first registered mapping.
    /// Without a requested size the first mapping wins.
    pub fn best_mapping<'a, I>(&self, mappings: I, size: Option<u64>) -> Option<TypeMapping>
    where
        I: IntoIterator<Item = &'a Mapping>,
    {
        let mut best: Option<(&NativeType, &Mapping)> = None;
        for mapping in mappings {
            let Some(native) = self.get_type(&mapping.native_type) else {
                continue;
            };
            let Some(wanted) = size else {
                best = Some((native, mapping));
                break;
            };
            if native.size == wanted {
                best = Some((native, mapping));
                break;
            }
            let candidate = native.capacity();
            best = match best {
                None => Some((native, mapping)),
                Some((current, _)) if current.capacity() >= wanted => {
                    if candidate >= wanted && candidate < current.capacity() {
                        Some((native, mapping))
                    } else {
                        best
                    }
                }
                Some((current, _)) => {
                    if candidate > current.capacity() {
                        Some((native, mapping))
                    } else {
                        best
                    }
                }
            };
        }
        best.map(|(native, mapping)| TypeMapping {
            native: native.clone(),
            mapping: mapping.clone(),
            requested_size: size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(types: &[(&str, u64)], jdbc_type: JdbcType) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        for (name, size) in types {
            registry.add_type(NativeType::new(*name, *size));
            registry
                .add_mapping(Mapping::sized(jdbc_type, *name))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_mapping_requires_registered_type() {
        let mut registry = TypeRegistry::new();
        let err = registry
            .add_mapping(Mapping::plain(JdbcType::Integer, "INT"))
            .unwrap_err();
        assert!(matches!(
            err,
            DdlError::Configuration { ref native_type, .. } if native_type == "INT"
        ));
        let err = registry
            .add_auto_increment_mapping(Mapping::plain(JdbcType::Integer, "SERIAL"))
            .unwrap_err();
        assert!(matches!(err, DdlError::Configuration { .. }));
    }

    #[test]
    fn test_exact_size_wins() {
        let registry = registry(&[("A", 300), ("B", 255), ("C", 260)], JdbcType::Varchar);
        let m = registry.get_type_mapping(JdbcType::Varchar, Some(255)).unwrap();
        assert_eq!(m.native_name(), "B");
    }

    #[test]
    fn test_smallest_sufficient_type_preferred() {
        let registry = registry(&[("A", 30), ("B", 20), ("C", 50)], JdbcType::Varchar);
        let m = registry.get_type_mapping(JdbcType::Varchar, Some(10)).unwrap();
        assert_eq!(m.native_name(), "B");
    }

    #[test]
    fn test_largest_type_when_none_fits() {
        let registry = registry(&[("A", 5), ("B", 8), ("C", 3)], JdbcType::Varchar);
        let m = registry.get_type_mapping(JdbcType::Varchar, Some(10)).unwrap();
        assert_eq!(m.native_name(), "B");
        assert!(!m.can_hold(Some(10)));
    }

    #[test]
    fn test_equidistant_prefers_type_that_holds_size() {
        let registry = registry(&[("SMALL", 10), ("LARGE", 20)], JdbcType::Varchar);
        let m = registry.get_type_mapping(JdbcType::Varchar, Some(15)).unwrap();
        assert_eq!(m.native_name(), "LARGE");
    }

    #[test]
    fn test_ties_keep_first_registered() {
        let registry = registry(&[("FIRST", 20), ("SECOND", 20)], JdbcType::Varchar);
        let m = registry.get_type_mapping(JdbcType::Varchar, Some(15)).unwrap();
        assert_eq!(m.native_name(), "FIRST");
        let m = registry.get_type_mapping(JdbcType::Varchar, None).unwrap();
        assert_eq!(m.native_name(), "FIRST");
    }

    #[test]
    fn test_unbounded_counts_as_largest() {
        let registry = registry(&[("TEXT", 0), ("VARCHAR", 255)], JdbcType::Varchar);
        let m = registry.get_type_mapping(JdbcType::Varchar, Some(100)).unwrap();
        assert_eq!(m.native_name(), "VARCHAR");
        let m = registry.get_type_mapping(JdbcType::Varchar, Some(4000)).unwrap();
        assert_eq!(m.native_name(), "TEXT");
    }

    #[test]
    fn test_plain_varchar_cannot_hold_4000() {
        let mut registry = TypeRegistry::new();
        registry.add_type(NativeType::new("VARCHAR", 255));
        registry.add_type(NativeType::new("TEXT", 0));
        registry
            .add_mapping(Mapping::sized(JdbcType::Varchar, "VARCHAR"))
            .unwrap();
        registry
            .add_mapping(Mapping::plain(JdbcType::LongVarchar, "TEXT"))
            .unwrap();

        let m = registry.get_type_mapping(JdbcType::Varchar, Some(4000)).unwrap();
        assert_eq!(m.native_name(), "VARCHAR");
        assert!(!m.can_hold(Some(4000)));
    }

    #[test]
    fn test_metadata_registration_keeps_largest() {
        let mut registry = TypeRegistry::new();
        registry.add_type_from_metadata(NativeType::new("VARCHAR", 4000));
        registry.add_type_from_metadata(NativeType::new("varchar", 255));
        assert_eq!(registry.get_type("VARCHAR").unwrap().size, 4000);
        registry.add_type_from_metadata(NativeType::new("VARCHAR", 0));
        assert_eq!(registry.get_type("VARCHAR").unwrap().size, 0);
        registry.add_type_from_metadata(NativeType::new("VARCHAR", 8000));
        assert_eq!(registry.get_type("VARCHAR").unwrap().size, 0);
    }

    #[test]
    fn test_auto_increment_order() {
        let mut registry = TypeRegistry::new();
        registry.add_type(NativeType::new("NUMERIC", 38));
        registry.add_type(NativeType::new("INT", 10));
        assert!(!registry.has_auto_increment_mappings());
        registry
            .add_auto_increment_mapping(Mapping::plain(JdbcType::Numeric, "NUMERIC"))
            .unwrap();
        registry
            .add_auto_increment_mapping(Mapping::plain(JdbcType::Integer, "INT"))
            .unwrap();
        registry
            .add_auto_increment_mapping(Mapping::plain(JdbcType::Numeric, "NUMERIC"))
            .unwrap();
        assert!(registry.has_auto_increment_mappings());
        assert_eq!(
            registry.auto_increment_type_names(),
            &[JdbcType::Numeric, JdbcType::Integer]
        );
        assert!(registry
            .get_auto_increment_mapping(JdbcType::Integer, Some(5))
            .is_some());
        assert!(registry.get_type_mapping(JdbcType::Integer, Some(5)).is_none());
    }

    #[test]
    fn test_render() {
        let mapping = TypeMapping {
            native: NativeType::new("DECIMAL", 38).with_scale(0, 38),
            mapping: Mapping::size_scale(JdbcType::Decimal, "DECIMAL"),
            requested_size: Some(12),
        };
        assert_eq!(mapping.render(Some(2)), "DECIMAL(12, 2)");
        assert_eq!(mapping.render(None), "DECIMAL(12)");

        let mapping = TypeMapping {
            native: NativeType::new("CHAR", 254),
            mapping: Mapping::sized(JdbcType::Char, "CHAR"),
            requested_size: Some(1),
        };
        assert_eq!(mapping.to_string(), "CHAR");

        let mapping = TypeMapping {
            native: NativeType::new("VARCHAR", 255),
            mapping: Mapping::sized(JdbcType::Varchar, "VARCHAR"),
            requested_size: Some(1000),
        };
        assert_eq!(mapping.effective_size(), Some(255));
        assert_eq!(mapping.to_string(), "VARCHAR(255)");
    }
}
