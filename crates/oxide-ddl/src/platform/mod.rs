//! Database platforms.
//!
//! A [`Platform`] bundles the static capabilities of one database brand,
//! its native type registry and the policy deciding which table changes
//! can be applied with ALTER statements. Platforms are looked up by name
//! in a [`PlatformRegistry`] built once at startup.

mod axion;
mod db2;
mod derby;
mod firebird;
mod hsqldb;
mod mckoi;
mod mssql;
mod mysql;
mod oracle;
mod postgres;
pub mod predicate;
mod sapdb;
mod sybase;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::comparator::ModelComparator;
use crate::error::{DdlError, Result};
use crate::mapper::TypeMapper;
use crate::model::ForeignKeyAction;
use crate::registry::{Mapping, NativeType, SizeFormat, TypeRegistry};
use crate::types::JdbcType;

pub use predicate::{DefaultTableDefinitionChangesPredicate, TableDefinitionChangesPredicate};

/// How far a platform can alter an existing column in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAlterSupport {
    /// Any type, size, default or nullability change.
    #[default]
    Full,
    /// Only changes that keep every existing value valid.
    WideningOnly,
    /// No in-place column changes.
    None,
}

/// Static facts about a database platform.
#[derive(Debug, Clone)]
pub struct PlatformInfo {
    /// Platform name.
    pub name: String,
    /// Maximum identifier length, `None` when unlimited.
    pub max_identifier_length: Option<usize>,
    /// Whether the primary key is declared inside CREATE TABLE.
    pub primary_key_embedded: bool,
    /// Whether foreign keys are declared inside CREATE TABLE.
    pub foreign_keys_embedded: bool,
    /// Whether indexes are declared inside CREATE TABLE.
    pub indices_embedded: bool,
    /// Whether nullable columns without default must say NULL explicitly.
    pub null_as_default_value_required: bool,
    /// Whether delimited identifiers are case sensitive.
    pub delimited_identifiers_case_sensitive: bool,
    /// Supported ON UPDATE actions.
    pub supported_on_update_actions: Vec<ForeignKeyAction>,
    /// Supported ON DELETE actions.
    pub supported_on_delete_actions: Vec<ForeignKeyAction>,
    /// Whether a primary key may combine auto-increment and plain columns.
    pub mixing_identity_and_normal_pk_allowed: bool,
    /// In-place column alteration support.
    pub column_alter: ColumnAlterSupport,
    /// Whether auto-increment can be switched on an existing column.
    pub auto_increment_change_supported: bool,
    /// Whether ADD COLUMN can place the column before the last one.
    pub positional_add_column_supported: bool,
    /// Whether a NOT NULL column without default can be added.
    pub add_required_column_without_default_supported: bool,
    /// Whether an auto-increment column can be added.
    pub add_auto_increment_column_supported: bool,
    /// Whether existing columns can be reordered.
    pub column_reorder_supported: bool,
    /// Whether a column that is part of the primary key can be dropped
    /// while the key changes.
    pub primary_key_column_drop_supported: bool,
    /// Names of indexes the database generates itself.
    pub system_index_pattern: Option<Regex>,
    /// Whether dropping an index also drops the foreign keys it backs.
    pub recreate_foreign_keys_on_index_drop: bool,
    /// JDBC drivers through which a database can be created or dropped.
    pub database_operation_drivers: Vec<String>,
    default_sizes: HashMap<JdbcType, u64>,
    sized_types: HashSet<JdbcType>,
    precision_types: HashSet<JdbcType>,
}

impl PlatformInfo {
    /// Creates a descriptor with permissive defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_identifier_length: None,
            primary_key_embedded: true,
            foreign_keys_embedded: false,
            indices_embedded: false,
            null_as_default_value_required: false,
            delimited_identifiers_case_sensitive: true,
            supported_on_update_actions: ForeignKeyAction::ALL.to_vec(),
            supported_on_delete_actions: ForeignKeyAction::ALL.to_vec(),
            mixing_identity_and_normal_pk_allowed: true,
            column_alter: ColumnAlterSupport::Full,
            auto_increment_change_supported: false,
            positional_add_column_supported: false,
            add_required_column_without_default_supported: false,
            add_auto_increment_column_supported: false,
            column_reorder_supported: false,
            primary_key_column_drop_supported: true,
            system_index_pattern: None,
            recreate_foreign_keys_on_index_drop: false,
            database_operation_drivers: Vec::new(),
            default_sizes: HashMap::new(),
            sized_types: [
                JdbcType::Char,
                JdbcType::Varchar,
                JdbcType::Binary,
                JdbcType::VarBinary,
            ]
            .into_iter()
            .collect(),
            precision_types: [JdbcType::Numeric, JdbcType::Decimal].into_iter().collect(),
        }
    }

    /// Default size for columns of `jdbc_type` that omit one.
    #[must_use]
    pub fn default_size(&self, jdbc_type: JdbcType) -> Option<u64> {
        self.default_sizes.get(&jdbc_type).copied()
    }

    /// Sets the default size for `jdbc_type`.
    pub fn set_default_size(&mut self, jdbc_type: JdbcType, size: u64) {
        self.default_sizes.insert(jdbc_type, size);
    }

    /// Whether columns of `jdbc_type` carry a size.
    #[must_use]
    pub fn has_size(&self, jdbc_type: JdbcType) -> bool {
        self.sized_types.contains(&jdbc_type)
    }

    /// Declares whether columns of `jdbc_type` carry a size.
    pub fn set_has_size(&mut self, jdbc_type: JdbcType, has_size: bool) {
        if has_size {
            self.sized_types.insert(jdbc_type);
        } else {
            self.sized_types.remove(&jdbc_type);
        }
    }

    /// Whether columns of `jdbc_type` carry precision and scale.
    #[must_use]
    pub fn has_precision_and_scale(&self, jdbc_type: JdbcType) -> bool {
        self.precision_types.contains(&jdbc_type)
    }

    /// Whether `action` is allowed in ON UPDATE.
    #[must_use]
    pub fn supports_on_update(&self, action: ForeignKeyAction) -> bool {
        self.supported_on_update_actions.contains(&action)
    }

    /// Whether `action` is allowed in ON DELETE.
    #[must_use]
    pub fn supports_on_delete(&self, action: ForeignKeyAction) -> bool {
        self.supported_on_delete_actions.contains(&action)
    }

    /// Whether `name` is an index the database generated itself.
    #[must_use]
    pub fn is_system_index_name(&self, name: &str) -> bool {
        self.system_index_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(name))
    }

    /// Shortens `name` to the maximum identifier length by cutting out its
    /// middle. The start and the end of the name are kept, joined by `_`
    /// unless the cut already lands next to one.
    #[must_use]
    pub fn shorten_name(&self, name: &str) -> String {
        let chars: Vec<char> = name.chars().collect();
        let Some(max) = self.max_identifier_length.filter(|&max| max > 0) else {
            return name.to_string();
        };
        if chars.len() <= max {
            return name.to_string();
        }
        let start = max / 2;
        let tail = start + chars.len() - max + 1;
        let mut short: String = chars[..start].iter().collect();
        let underscore_before = start > 0 && chars[start - 1] == '_';
        let underscore_after = tail < chars.len() && chars[tail] == '_';
        if !underscore_before && !underscore_after {
            short.push('_');
        }
        short.extend(&chars[tail..]);
        short
    }
}

/// One database platform: capabilities, native types and change policy.
#[derive(Debug, Clone)]
pub struct Platform {
    info: Arc<PlatformInfo>,
    types: TypeRegistry,
    predicate: Arc<dyn TableDefinitionChangesPredicate>,
}

impl Platform {
    /// Creates a platform using the default change policy.
    #[must_use]
    pub fn new(info: PlatformInfo, types: TypeRegistry) -> Self {
        let info = Arc::new(info);
        let predicate = Arc::new(DefaultTableDefinitionChangesPredicate::new(Arc::clone(&info)));
        Self {
            info,
            types,
            predicate,
        }
    }

    /// Replaces the change policy.
    #[must_use]
    pub fn with_predicate(mut self, predicate: Arc<dyn TableDefinitionChangesPredicate>) -> Self {
        self.predicate = predicate;
        self
    }

    /// Platform name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Static capabilities.
    #[must_use]
    pub fn info(&self) -> &PlatformInfo {
        &self.info
    }

    /// Native type registry.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Change policy.
    #[must_use]
    pub fn predicate(&self) -> &dyn TableDefinitionChangesPredicate {
        self.predicate.as_ref()
    }

    /// A type mapper for this platform.
    #[must_use]
    pub fn type_mapper(&self) -> TypeMapper<'_> {
        TypeMapper::new(&self.types, &self.info)
    }

    /// A model comparator for this platform.
    #[must_use]
    pub fn model_comparator(&self, case_sensitive: bool) -> ModelComparator<'_> {
        ModelComparator::new(&self.info, self.predicate.as_ref(), case_sensitive)
    }

    /// Checks that `operation` (creating or dropping a database) can be
    /// performed through `driver`.
    pub fn ensure_database_operation(&self, operation: &str, driver: &str) -> Result<()> {
        if self
            .info
            .database_operation_drivers
            .iter()
            .any(|d| d == driver)
        {
            return Ok(());
        }
        Err(DdlError::UnsupportedOperation {
            platform: self.info.name.clone(),
            operation: operation.to_string(),
            driver: driver.to_string(),
        })
    }
}

/// Mapping renders no size.
pub(crate) const PLAIN: SizeFormat = SizeFormat::None;
/// Mapping renders `(N)`.
pub(crate) const SIZED: SizeFormat = SizeFormat::Size;
/// Mapping renders `(N)` or `(N, S)`.
pub(crate) const PRECISION: SizeFormat = SizeFormat::SizeScale;

/// Static description of a platform's native types.
pub(crate) struct TypeTables<'a> {
    /// (name, size) of every native type.
    pub types: &'a [(&'static str, u64)],
    /// (name, min scale, max scale) for types with a scale.
    pub scales: &'a [(&'static str, u32, u32)],
    /// Ordinary mappings.
    pub mappings: &'a [(JdbcType, &'static str, SizeFormat)],
    /// Auto-increment mappings.
    pub auto_increment: &'a [(JdbcType, &'static str, SizeFormat)],
}

impl TypeTables<'_> {
    /// Builds the registry, failing on mappings to unknown types.
    pub(crate) fn build(&self) -> Result<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        for (name, size) in self.types {
            let mut native = NativeType::new(*name, *size);
            if let Some((_, min, max)) = self.scales.iter().find(|(n, _, _)| n == name) {
                native = native.with_scale(*min, *max);
            }
            registry.add_type(native);
        }
        for (jdbc_type, native, format) in self.mappings {
            registry.add_mapping(Mapping::new(*jdbc_type, *native, *format))?;
        }
        for (jdbc_type, native, format) in self.auto_increment {
            registry.add_auto_increment_mapping(Mapping::new(*jdbc_type, *native, *format))?;
        }
        Ok(registry)
    }
}

/// Compiles a system index name pattern.
pub(crate) fn system_index_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!(pattern, error = %err, "Ignoring invalid system index pattern");
            None
        }
    }
}

/// Platforms by case-insensitive name or alias.
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    platforms: Vec<Arc<Platform>>,
    names: HashMap<String, usize>,
}

impl PlatformRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in platform.
    pub fn with_builtin_platforms() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(mysql::platform()?, &[]);
        registry.register(postgres::platform()?, &["Postgres", "PostgreSQL"]);
        registry.register(oracle::platform()?, &["Oracle8", "Oracle9", "Oracle10"]);
        registry.register(firebird::platform()?, &["Interbase"]);
        registry.register(mssql::platform()?, &["SqlServer"]);
        registry.register(sapdb::platform()?, &["MaxDB"]);
        registry.register(sybase::platform()?, &[]);
        registry.register(db2::platform()?, &[]);
        registry.register(derby::platform()?, &[]);
        registry.register(derby::cloudscape()?, &[]);
        registry.register(hsqldb::platform()?, &["Hsql"]);
        registry.register(mckoi::platform()?, &[]);
        registry.register(axion::platform()?, &[]);
        Ok(registry)
    }

    /// Registers a platform under its name and `aliases`. A later
    /// registration under the same name wins.
    pub fn register(&mut self, platform: Platform, aliases: &[&str]) {
        let idx = self.platforms.len();
        debug!(platform = %platform.name(), ?aliases, "Registering platform");
        self.names.insert(platform.name().to_ascii_lowercase(), idx);
        for alias in aliases {
            self.names.insert(alias.to_ascii_lowercase(), idx);
        }
        self.platforms.push(Arc::new(platform));
    }

    /// Looks up a platform by name or alias, ignoring case.
    pub fn get(&self, name: &str) -> Result<Arc<Platform>> {
        self.names
            .get(&name.trim().to_ascii_lowercase())
            .map(|idx| Arc::clone(&self.platforms[*idx]))
            .ok_or_else(|| DdlError::UnknownPlatform(name.to_string()))
    }

    /// Registered platform names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.platforms
            .iter()
            .enumerate()
            .filter(|(idx, p)| self.names.get(&p.name().to_ascii_lowercase()) == Some(idx))
            .map(|(_, p)| p.name())
            .collect()
    }
}
