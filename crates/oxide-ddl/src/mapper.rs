//! Column type mapping.
//!
//! Resolves abstract column types onto a platform's native types,
//! promoting within a type family when the exact type is missing or too
//! small. Mapping never mutates its input: tables and databases are
//! returned as new values.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::error::{DdlError, Result};
use crate::model::{names_equal, Column, Database, Table};
use crate::platform::PlatformInfo;
use crate::registry::{TypeMapping, TypeRegistry};
use crate::types::JdbcType;

/// Maps columns onto the native types of one platform.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    types: &'a TypeRegistry,
    info: &'a PlatformInfo,
    case_sensitive: bool,
}

impl<'a> TypeMapper<'a> {
    /// Creates a mapper over a platform's registry and capabilities.
    #[must_use]
    pub fn new(types: &'a TypeRegistry, info: &'a PlatformInfo) -> Self {
        Self {
            types,
            info,
            case_sensitive: false,
        }
    }

    /// Sets whether table and column names are matched case-sensitively
    /// when following foreign keys.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Best mapping among the wider members of the type's family.
    ///
    /// Picks the smallest candidate that holds `size`, or the largest
    /// candidate when none does. Never leaves the family.
    #[must_use]
    pub fn promote(&self, jdbc_type: JdbcType, size: Option<u64>) -> Option<TypeMapping> {
        let family = jdbc_type.family()?;
        let candidates = family.promotion_candidates(jdbc_type);
        let mapping = self.types.best_mapping(
            candidates
                .iter()
                .flat_map(|candidate| self.types.mappings_for(*candidate)),
            size,
        );
        if let Some(mapping) = &mapping {
            trace!(
                from = %jdbc_type,
                to = %mapping.jdbc_type(),
                native_type = %mapping.native_name(),
                "Promotion candidate"
            );
        }
        mapping
    }

    /// Mapping for `to`, provided `to` is a widening of `from` within the
    /// same family.
    #[must_use]
    pub fn promote_to(
        &self,
        from: JdbcType,
        to: JdbcType,
        size: Option<u64>,
    ) -> Option<TypeMapping> {
        if !Self::can_promote(from, to) {
            return None;
        }
        self.types.get_type_mapping(to, size)
    }

    fn can_promote(from: JdbcType, to: JdbcType) -> bool {
        match (from.family(), to.family()) {
            (Some(a), Some(b)) if a == b => a.is_widening(from, to),
            _ => from == to,
        }
    }

    /// Exact mapping if it holds `size`, otherwise the promoted mapping.
    /// When neither holds the size, the exact mapping is preferred so the
    /// caller can report the capacity shortfall on the requested type.
    #[must_use]
    pub fn resolve(&self, jdbc_type: JdbcType, size: Option<u64>) -> Option<TypeMapping> {
        let exact = self.types.get_type_mapping(jdbc_type, size);
        if exact.as_ref().is_some_and(|m| m.can_hold(size)) {
            return exact;
        }
        let promoted = self.promote(jdbc_type, size);
        if promoted.as_ref().is_some_and(|m| m.can_hold(size)) {
            return promoted;
        }
        exact.or(promoted)
    }

    fn resolve_auto_increment(&self, jdbc_type: JdbcType, size: Option<u64>) -> Option<TypeMapping> {
        let direct = self.types.get_auto_increment_mapping(jdbc_type, size);
        if direct.as_ref().is_some_and(|m| m.can_hold(size)) {
            return direct;
        }
        let promoted = self
            .types
            .auto_increment_type_names()
            .iter()
            .filter(|to| **to != jdbc_type && Self::can_promote(jdbc_type, **to))
            .find_map(|to| {
                self.types
                    .get_auto_increment_mapping(*to, size)
                    .filter(|m| m.can_hold(size))
            });
        promoted.or(direct)
    }

    /// Size a column asks for: its own, or the platform default.
    #[must_use]
    pub fn requested_size(&self, column: &Column) -> Option<u64> {
        column
            .size
            .or_else(|| self.info.default_size(column.jdbc_type))
    }

    /// Maps one column. The result carries the selected abstract type and
    /// the native type name; mapping an already mapped column again
    /// changes nothing.
    pub fn map_column(&self, table_name: &str, column: &Column) -> Result<Column> {
        let requested = self.requested_size(column);
        let mapping = if column.auto_increment && self.types.has_auto_increment_mappings() {
            self.resolve_auto_increment(column.jdbc_type, requested)
        } else {
            self.resolve(column.jdbc_type, requested)
        }
        .ok_or_else(|| DdlError::UnsupportedColumnType {
            table: table_name.to_string(),
            column: column.name.clone(),
            type_name: column.jdbc_type.to_string(),
            platform: self.info.name.clone(),
        })?;

        if let Some(requested) = requested {
            if !mapping.can_hold(Some(requested)) {
                return Err(DdlError::ColumnExceedsTypeCapacity {
                    table: table_name.to_string(),
                    column: column.name.clone(),
                    native_type: mapping.native_name().to_string(),
                    requested,
                    capacity: mapping.native.size,
                });
            }
        }
        if let (Some(scale), Some(max_scale)) = (column.scale, mapping.native.max_scale) {
            if scale > max_scale {
                return Err(DdlError::ColumnExceedsTypeCapacity {
                    table: table_name.to_string(),
                    column: column.name.clone(),
                    native_type: mapping.native_name().to_string(),
                    requested: u64::from(scale),
                    capacity: u64::from(max_scale),
                });
            }
        }

        if mapping.jdbc_type() != column.jdbc_type {
            debug!(
                table = %table_name,
                column = %column.name,
                from = %column.jdbc_type,
                to = %mapping.jdbc_type(),
                native_type = %mapping.native_name(),
                "Promoted column type"
            );
        }

        let mut mapped = column.clone();
        mapped.jdbc_type = mapping.jdbc_type();
        mapped.native_type = Some(mapping.native_name().to_string());
        Ok(mapped)
    }

    /// Maps every column of a table.
    pub fn map_table(&self, table: &Table) -> Result<Table> {
        let columns = table
            .columns
            .iter()
            .map(|column| self.map_column(&table.name, column))
            .collect::<Result<Vec<_>>>()?;
        Ok(Table {
            columns,
            ..table.clone()
        })
    }

    /// Maps a whole database. Foreign key columns follow the type of the
    /// column they reference whenever that column changed type.
    pub fn map_database(&self, database: &Database) -> Result<Database> {
        let tables = database
            .tables
            .iter()
            .map(|table| self.map_table(table))
            .collect::<Result<Vec<_>>>()?;
        let mut mapped = Database {
            name: database.name.clone(),
            tables,
        };

        let seeds = database
            .tables
            .iter()
            .zip(&mapped.tables)
            .flat_map(|(before, after)| {
                before
                    .columns
                    .iter()
                    .zip(&after.columns)
                    .filter(|(b, a)| b.jdbc_type != a.jdbc_type)
                    .map(move |(_, a)| (after.name.clone(), a.name.clone()))
            })
            .collect();
        self.propagate_foreign_key_types(&mut mapped, seeds);
        Ok(mapped)
    }

    /// Copies the type of every changed column into the foreign key
    /// columns that reference it, following chains of foreign keys.
    fn propagate_foreign_key_types(
        &self,
        database: &mut Database,
        mut pending: VecDeque<(String, String)>,
    ) {
        let cs = self.case_sensitive;
        let mut visited: HashSet<(String, String)> = HashSet::new();

        while let Some((table_name, column_name)) = pending.pop_front() {
            let Some(source) = database
                .find_table(&table_name, cs)
                .and_then(|t| t.find_column(&column_name, cs))
                .cloned()
            else {
                continue;
            };

            let mut updates = Vec::new();
            for table in &database.tables {
                for fk in table
                    .foreign_keys
                    .iter()
                    .filter(|fk| fk.references_table(&table_name, cs))
                {
                    for reference in fk
                        .references
                        .iter()
                        .filter(|r| names_equal(&r.foreign_column, &column_name, cs))
                    {
                        updates.push((table.name.clone(), reference.local_column.clone()));
                    }
                }
            }

            for (table, local) in updates {
                let key = if cs {
                    (table.clone(), local.clone())
                } else {
                    (table.to_ascii_lowercase(), local.to_ascii_lowercase())
                };
                if !visited.insert(key) {
                    continue;
                }
                let Some(column) = database
                    .find_table_mut(&table, cs)
                    .and_then(|t| t.find_column_mut(&local, cs))
                else {
                    continue;
                };
                // Identity types belong to the key column only.
                let native_type = if source.auto_increment && !column.auto_increment {
                    self.resolve(source.jdbc_type, source.size)
                        .map(|m| m.native_name().to_string())
                        .or_else(|| source.native_type.clone())
                } else {
                    source.native_type.clone()
                };
                if column.jdbc_type == source.jdbc_type
                    && column.native_type == native_type
                    && column.size == source.size
                    && column.scale == source.scale
                {
                    continue;
                }
                debug!(
                    table = %table,
                    column = %local,
                    references = %format!("{table_name}.{column_name}"),
                    jdbc_type = %source.jdbc_type,
                    "Propagating type to foreign key column"
                );
                column.jdbc_type = source.jdbc_type;
                column.native_type = native_type;
                column.size = source.size;
                column.scale = source.scale;
                pending.push_back((table, local));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForeignKey;
    use crate::registry::{Mapping, NativeType};

    fn text_platform() -> (TypeRegistry, PlatformInfo) {
        let mut types = TypeRegistry::new();
        types.add_type(NativeType::new("VARCHAR", 255));
        types.add_type(NativeType::new("TEXT", 0));
        types.add_type(NativeType::new("INTEGER", 10));
        types.add_type(NativeType::new("BIGINT", 19));
        types.add_type(NativeType::new("DECIMAL", 38).with_scale(0, 38));
        types
            .add_mapping(Mapping::sized(JdbcType::Varchar, "VARCHAR"))
            .unwrap();
        types
            .add_mapping(Mapping::plain(JdbcType::LongVarchar, "TEXT"))
            .unwrap();
        types
            .add_mapping(Mapping::plain(JdbcType::Integer, "INTEGER"))
            .unwrap();
        types
            .add_mapping(Mapping::plain(JdbcType::BigInt, "BIGINT"))
            .unwrap();
        types
            .add_mapping(Mapping::size_scale(JdbcType::Decimal, "DECIMAL"))
            .unwrap();
        types
            .add_mapping(Mapping::size_scale(JdbcType::Numeric, "DECIMAL"))
            .unwrap();
        (types, PlatformInfo::new("Test"))
    }

    #[test]
    fn test_varchar_4000_promotes_to_text() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info);
        let mapping = mapper.resolve(JdbcType::Varchar, Some(4000)).unwrap();
        assert_eq!(mapping.jdbc_type(), JdbcType::LongVarchar);
        assert_eq!(mapping.native_name(), "TEXT");

        let column = Column::new("body", JdbcType::Varchar).size(4000);
        let mapped = mapper.map_column("posts", &column).unwrap();
        assert_eq!(mapped.jdbc_type, JdbcType::LongVarchar);
        assert_eq!(mapped.native_type.as_deref(), Some("TEXT"));
        assert_eq!(mapped.size, Some(4000));
    }

    #[test]
    fn test_exact_mapping_kept() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info);
        let column = Column::new("qty", JdbcType::Integer).size(5);
        let mapped = mapper.map_column("items", &column).unwrap();
        assert_eq!(mapped.jdbc_type, JdbcType::Integer);
        assert_eq!(mapped.native_type.as_deref(), Some("INTEGER"));
    }

    #[test]
    fn test_decimal_over_capacity_fails() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info);
        let column = Column::new("amount", JdbcType::Decimal).size(40);
        let err = mapper.map_column("ledger", &column).unwrap_err();
        assert!(matches!(
            err,
            DdlError::ColumnExceedsTypeCapacity { ref column, requested: 40, capacity: 38, .. }
                if column == "amount"
        ));
    }

    #[test]
    fn test_scale_over_capacity_fails() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info);
        let column = Column::new("rate", JdbcType::Decimal).size(20).scale(40);
        let err = mapper.map_column("ledger", &column).unwrap_err();
        assert!(matches!(
            err,
            DdlError::ColumnExceedsTypeCapacity { requested: 40, capacity: 38, .. }
        ));
    }

    #[test]
    fn test_promotion_never_crosses_families() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info);
        assert!(mapper.promote(JdbcType::Char, Some(10)).is_some_and(|m| m.jdbc_type().is_text()));
        assert!(mapper.promote(JdbcType::Double, Some(10)).is_none());
        assert!(mapper.promote_to(JdbcType::Varchar, JdbcType::BigInt, None).is_none());
        assert!(mapper.promote_to(JdbcType::BigInt, JdbcType::Integer, None).is_none());
        assert!(mapper.promote_to(JdbcType::Integer, JdbcType::BigInt, None).is_some());
    }

    #[test]
    fn test_unsupported_type_names_column() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info);
        let column = Column::new("photo", JdbcType::Blob);
        let err = mapper.map_column("users", &column).unwrap_err();
        assert!(matches!(
            err,
            DdlError::UnsupportedColumnType { ref table, ref column, .. }
                if table == "users" && column == "photo"
        ));
        assert!(err.to_string().contains("users.photo"));
    }

    #[test]
    fn test_map_column_is_idempotent() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info);
        for column in [
            Column::new("a", JdbcType::Varchar).size(4000),
            Column::new("b", JdbcType::Integer).size(12),
            Column::new("c", JdbcType::Decimal).size(10).scale(2),
        ] {
            let once = mapper.map_column("t", &column).unwrap();
            let twice = mapper.map_column("t", &once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_auto_increment_promotes_through_registered_types() {
        let mut types = TypeRegistry::new();
        types.add_type(NativeType::new("INT", 10));
        types.add_type(NativeType::new("NUMERIC", 38).with_scale(0, 38));
        types
            .add_mapping(Mapping::plain(JdbcType::Integer, "INT"))
            .unwrap();
        types
            .add_auto_increment_mapping(Mapping::size_scale(JdbcType::Numeric, "NUMERIC"))
            .unwrap();
        let info = PlatformInfo::new("Test");
        let mapper = TypeMapper::new(&types, &info);

        let id = Column::new("id", JdbcType::Integer).primary_key().auto_increment();
        let mapped = mapper.map_column("t", &id).unwrap();
        assert_eq!(mapped.jdbc_type, JdbcType::Numeric);
        assert_eq!(mapped.native_type.as_deref(), Some("NUMERIC"));

        let plain = Column::new("n", JdbcType::Integer);
        assert_eq!(
            mapper.map_column("t", &plain).unwrap().native_type.as_deref(),
            Some("INT")
        );
    }

    #[test]
    fn test_auto_increment_without_mappings_uses_ordinary() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info);
        let id = Column::new("id", JdbcType::Integer).auto_increment();
        let mapped = mapper.map_column("t", &id).unwrap();
        assert_eq!(mapped.native_type.as_deref(), Some("INTEGER"));
    }

    #[test]
    fn test_foreign_key_columns_follow_promoted_type() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info);
        let db = Database::new("d")
            .table(Table::new("a").column(Column::new("id", JdbcType::Integer).size(15).primary_key()))
            .table(
                Table::new("b")
                    .column(Column::new("id", JdbcType::Integer).primary_key())
                    .column(Column::new("a_id", JdbcType::Integer))
                    .foreign_key(ForeignKey::new("a").reference("a_id", "id")),
            )
            .table(
                Table::new("c")
                    .column(Column::new("b_a_id", JdbcType::Integer))
                    .foreign_key(ForeignKey::new("B").reference("B_A_ID", "A_ID")),
            );

        let mapped = mapper.map_database(&db).unwrap();
        let a_id = mapped.tables[0].find_column("id", false).unwrap();
        assert_eq!(a_id.jdbc_type, JdbcType::BigInt);

        let b_a_id = mapped.tables[1].find_column("a_id", false).unwrap();
        assert_eq!(b_a_id.jdbc_type, JdbcType::BigInt);
        assert_eq!(b_a_id.native_type.as_deref(), Some("BIGINT"));
        assert_eq!(b_a_id.size, Some(15));

        let c_col = mapped.tables[2].find_column("b_a_id", false).unwrap();
        assert_eq!(c_col.jdbc_type, JdbcType::BigInt);

        // The input is left untouched.
        assert_eq!(db.tables[1].columns[1].jdbc_type, JdbcType::Integer);
        assert!(db.tables[1].columns[1].native_type.is_none());
    }

    #[test]
    fn test_case_sensitive_propagation_keeps_tables_apart() {
        let (types, info) = text_platform();
        let mapper = TypeMapper::new(&types, &info).case_sensitive(true);
        let referencing = |name: &str| {
            Table::new(name)
                .column(Column::new("x", JdbcType::Integer))
                .foreign_key(ForeignKey::new("a").reference("x", "id"))
        };
        let db = Database::new("d")
            .table(Table::new("a").column(Column::new("id", JdbcType::Integer).size(15).primary_key()))
            .table(referencing("T"))
            .table(referencing("t"));

        let mapped = mapper.map_database(&db).unwrap();
        for name in ["T", "t"] {
            let x = mapped
                .find_table(name, true)
                .and_then(|t| t.find_column("x", true))
                .unwrap();
            assert_eq!(x.jdbc_type, JdbcType::BigInt, "column {name}.x");
        }
    }
}
