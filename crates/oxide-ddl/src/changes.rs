//! Model changes.
//!
//! A [`Change`] is one structural step between two schema states. The
//! comparator emits them in dependency order and every change can replay
//! itself onto an in-memory [`Database`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};
use crate::model::{names_equal, Column, Database, ForeignKey, Index, Table};

/// A single structural change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// Create a table. Foreign keys are added by separate changes.
    AddTable {
        /// The new table, without foreign keys.
        table: Table,
    },

    /// Drop a table.
    RemoveTable {
        /// Table name.
        table_name: String,
    },

    /// Add a column.
    AddColumn {
        /// Table name.
        table_name: String,
        /// Column definition. Primary key membership is set by a
        /// separate primary key change.
        column: Column,
        /// Column the new one follows, `None` for the first position.
        previous_column: Option<String>,
        /// Whether the column is appended after all existing columns.
        at_end: bool,
    },

    /// Drop a column.
    RemoveColumn {
        /// Table name.
        table_name: String,
        /// Column name.
        column_name: String,
    },

    /// Change type, size, scale, default or nullability of a column.
    ColumnDefinitionChange {
        /// Table name.
        table_name: String,
        /// Column name.
        column_name: String,
        /// The new definition.
        new_column: Column,
    },

    /// Switch auto-increment on or off.
    ColumnAutoIncrementChange {
        /// Table name.
        table_name: String,
        /// Column name.
        column_name: String,
        /// New auto-increment state.
        auto_increment: bool,
    },

    /// Reorder the columns of a table.
    ColumnOrderChange {
        /// Table name.
        table_name: String,
        /// All column names, in the new order.
        new_order: Vec<String>,
    },

    /// Add a primary key to a table without one.
    AddPrimaryKey {
        /// Table name.
        table_name: String,
        /// Key columns, in order.
        column_names: Vec<String>,
    },

    /// Drop the primary key.
    RemovePrimaryKey {
        /// Table name.
        table_name: String,
        /// Columns of the dropped key.
        column_names: Vec<String>,
    },

    /// Replace the primary key.
    PrimaryKeyChange {
        /// Table name.
        table_name: String,
        /// Current key columns.
        old_column_names: Vec<String>,
        /// New key columns.
        new_column_names: Vec<String>,
    },

    /// Create an index.
    AddIndex {
        /// Table name.
        table_name: String,
        /// Index definition.
        index: Index,
    },

    /// Drop an index.
    RemoveIndex {
        /// Table name.
        table_name: String,
        /// Index definition.
        index: Index,
    },

    /// Add a foreign key.
    AddForeignKey {
        /// Table name.
        table_name: String,
        /// Foreign key definition.
        foreign_key: ForeignKey,
    },

    /// Drop a foreign key.
    RemoveForeignKey {
        /// Table name.
        table_name: String,
        /// Foreign key definition.
        foreign_key: ForeignKey,
    },

    /// Rebuild a table whose definition changes cannot be applied in
    /// place: create `temporary_name` with the target definition, copy
    /// the data, drop the original and rename.
    RecreateTable {
        /// Table name.
        table_name: String,
        /// Name of the temporary table used while copying.
        temporary_name: String,
        /// Definition after the rebuild, without foreign keys.
        target_table: Table,
        /// The definition changes the platform could not apply.
        changes: Vec<Change>,
    },
}

impl Change {
    /// Creates an add table change. Foreign keys are stripped.
    #[must_use]
    pub fn add_table(table: &Table) -> Self {
        Self::AddTable {
            table: Table {
                foreign_keys: Vec::new(),
                ..table.clone()
            },
        }
    }

    /// Creates a remove table change.
    #[must_use]
    pub fn remove_table(table_name: impl Into<String>) -> Self {
        Self::RemoveTable {
            table_name: table_name.into(),
        }
    }

    /// Creates a remove column change.
    #[must_use]
    pub fn remove_column(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self::RemoveColumn {
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }

    /// Creates an add index change.
    #[must_use]
    pub fn add_index(table_name: impl Into<String>, index: Index) -> Self {
        Self::AddIndex {
            table_name: table_name.into(),
            index,
        }
    }

    /// Creates a remove index change.
    #[must_use]
    pub fn remove_index(table_name: impl Into<String>, index: Index) -> Self {
        Self::RemoveIndex {
            table_name: table_name.into(),
            index,
        }
    }

    /// Creates an add foreign key change.
    #[must_use]
    pub fn add_foreign_key(table_name: impl Into<String>, foreign_key: ForeignKey) -> Self {
        Self::AddForeignKey {
            table_name: table_name.into(),
            foreign_key,
        }
    }

    /// Creates a remove foreign key change.
    #[must_use]
    pub fn remove_foreign_key(table_name: impl Into<String>, foreign_key: ForeignKey) -> Self {
        Self::RemoveForeignKey {
            table_name: table_name.into(),
            foreign_key,
        }
    }

    /// Name of the table the change applies to.
    #[must_use]
    pub fn table_name(&self) -> &str {
        match self {
            Self::AddTable { table } => &table.name,
            Self::RemoveTable { table_name }
            | Self::AddColumn { table_name, .. }
            | Self::RemoveColumn { table_name, .. }
            | Self::ColumnDefinitionChange { table_name, .. }
            | Self::ColumnAutoIncrementChange { table_name, .. }
            | Self::ColumnOrderChange { table_name, .. }
            | Self::AddPrimaryKey { table_name, .. }
            | Self::RemovePrimaryKey { table_name, .. }
            | Self::PrimaryKeyChange { table_name, .. }
            | Self::AddIndex { table_name, .. }
            | Self::RemoveIndex { table_name, .. }
            | Self::AddForeignKey { table_name, .. }
            | Self::RemoveForeignKey { table_name, .. }
            | Self::RecreateTable { table_name, .. } => table_name,
        }
    }

    /// Whether the change alters columns or the primary key of an
    /// existing table.
    #[must_use]
    pub fn is_table_definition_change(&self) -> bool {
        matches!(
            self,
            Self::AddColumn { .. }
                | Self::RemoveColumn { .. }
                | Self::ColumnDefinitionChange { .. }
                | Self::ColumnAutoIncrementChange { .. }
                | Self::ColumnOrderChange { .. }
                | Self::AddPrimaryKey { .. }
                | Self::RemovePrimaryKey { .. }
                | Self::PrimaryKeyChange { .. }
        )
    }

    /// Applies the change to `database`.
    pub fn apply(&self, database: &mut Database, case_sensitive: bool) -> Result<()> {
        let cs = case_sensitive;
        match self {
            Self::AddTable { table } => {
                if database.find_table(&table.name, cs).is_some() {
                    return Err(DdlError::InvalidState(format!(
                        "Table '{}' already exists",
                        table.name
                    )));
                }
                database.tables.push(table.clone());
            }

            Self::RemoveTable { table_name } => {
                let idx = database
                    .table_position(table_name, cs)
                    .ok_or_else(|| missing_table(table_name))?;
                database.tables.remove(idx);
            }

            Self::AddColumn {
                table_name,
                column,
                previous_column,
                at_end,
            } => {
                let table = table_mut(database, table_name, cs)?;
                if table.find_column(&column.name, cs).is_some() {
                    return Err(DdlError::InvalidState(format!(
                        "Column '{}' already exists in table '{}'",
                        column.name, table_name
                    )));
                }
                let position = if *at_end {
                    table.columns.len()
                } else if let Some(previous) = previous_column {
                    table
                        .column_position(previous, cs)
                        .ok_or_else(|| missing_column(table_name, previous))?
                        + 1
                } else {
                    0
                };
                let mut column = column.clone();
                column.primary_key = false;
                table.columns.insert(position, column);
            }

            Self::RemoveColumn {
                table_name,
                column_name,
            } => {
                let table = table_mut(database, table_name, cs)?;
                let idx = table
                    .column_position(column_name, cs)
                    .ok_or_else(|| missing_column(table_name, column_name))?;
                table.columns.remove(idx);
            }

            Self::ColumnDefinitionChange {
                table_name,
                column_name,
                new_column,
            } => {
                let column = column_mut(database, table_name, column_name, cs)?;
                column.jdbc_type = new_column.jdbc_type;
                column.native_type.clone_from(&new_column.native_type);
                column.size = new_column.size;
                column.scale = new_column.scale;
                column.required = new_column.required;
                column.default_value.clone_from(&new_column.default_value);
            }

            Self::ColumnAutoIncrementChange {
                table_name,
                column_name,
                auto_increment,
            } => {
                column_mut(database, table_name, column_name, cs)?.auto_increment = *auto_increment;
            }

            Self::ColumnOrderChange {
                table_name,
                new_order,
            } => {
                let table = table_mut(database, table_name, cs)?;
                if new_order.len() != table.columns.len() {
                    return Err(DdlError::InvalidState(format!(
                        "New column order of table '{table_name}' lists {} columns, table has {}",
                        new_order.len(),
                        table.columns.len()
                    )));
                }
                let mut remaining = std::mem::take(&mut table.columns);
                for name in new_order {
                    let Some(idx) = remaining
                        .iter()
                        .position(|c| names_equal(&c.name, name, cs))
                    else {
                        table.columns.append(&mut remaining);
                        return Err(missing_column(table_name, name));
                    };
                    table.columns.push(remaining.remove(idx));
                }
            }

            Self::AddPrimaryKey {
                table_name,
                column_names,
            } => {
                let table = table_mut(database, table_name, cs)?;
                if table.has_primary_key() {
                    return Err(DdlError::InvalidState(format!(
                        "Table '{table_name}' already has a primary key"
                    )));
                }
                set_primary_key(table, column_names, cs)?;
            }

            Self::RemovePrimaryKey {
                table_name,
                column_names,
            } => {
                let table = table_mut(database, table_name, cs)?;
                expect_primary_key(table, column_names, cs)?;
                for column in &mut table.columns {
                    column.primary_key = false;
                }
            }

            Self::PrimaryKeyChange {
                table_name,
                old_column_names,
                new_column_names,
            } => {
                let table = table_mut(database, table_name, cs)?;
                expect_primary_key(table, old_column_names, cs)?;
                set_primary_key(table, new_column_names, cs)?;
            }

            Self::AddIndex { table_name, index } => {
                table_mut(database, table_name, cs)?
                    .indexes
                    .push(index.clone());
            }

            Self::RemoveIndex { table_name, index } => {
                let table = table_mut(database, table_name, cs)?;
                let idx = table
                    .indexes
                    .iter()
                    .position(|i| i.is_equivalent(index, cs))
                    .ok_or_else(|| {
                        DdlError::InvalidState(format!(
                            "Index '{}' does not exist in table '{}'",
                            index.name.as_deref().unwrap_or("<unnamed>"),
                            table_name
                        ))
                    })?;
                table.indexes.remove(idx);
            }

            Self::AddForeignKey {
                table_name,
                foreign_key,
            } => {
                if database.find_table(&foreign_key.foreign_table, cs).is_none() {
                    return Err(missing_table(&foreign_key.foreign_table));
                }
                table_mut(database, table_name, cs)?
                    .foreign_keys
                    .push(foreign_key.clone());
            }

            Self::RemoveForeignKey {
                table_name,
                foreign_key,
            } => {
                let table = table_mut(database, table_name, cs)?;
                let idx = table
                    .foreign_keys
                    .iter()
                    .position(|fk| fk.is_equivalent(foreign_key, cs))
                    .ok_or_else(|| {
                        DdlError::InvalidState(format!(
                            "Foreign key '{}' does not exist in table '{}'",
                            foreign_key.name.as_deref().unwrap_or("<unnamed>"),
                            table_name
                        ))
                    })?;
                table.foreign_keys.remove(idx);
            }

            Self::RecreateTable {
                table_name,
                target_table,
                ..
            } => {
                let table = table_mut(database, table_name, cs)?;
                table.columns.clone_from(&target_table.columns);
                table.indexes.clone_from(&target_table.indexes);
            }
        }
        Ok(())
    }
}

fn missing_table(table_name: &str) -> DdlError {
    DdlError::InvalidState(format!("Table '{table_name}' does not exist"))
}

fn missing_column(table_name: &str, column_name: &str) -> DdlError {
    DdlError::InvalidState(format!(
        "Column '{column_name}' does not exist in table '{table_name}'"
    ))
}

fn table_mut<'a>(database: &'a mut Database, table_name: &str, cs: bool) -> Result<&'a mut Table> {
    database
        .find_table_mut(table_name, cs)
        .ok_or_else(|| missing_table(table_name))
}

fn column_mut<'a>(
    database: &'a mut Database,
    table_name: &str,
    column_name: &str,
    cs: bool,
) -> Result<&'a mut Column> {
    table_mut(database, table_name, cs)?
        .find_column_mut(column_name, cs)
        .ok_or_else(|| missing_column(table_name, column_name))
}

/// Checks the key membership. Order is not checked since a column
/// reorder may already have moved the key columns.
fn expect_primary_key(table: &Table, column_names: &[String], cs: bool) -> Result<()> {
    let current = table.primary_key_names();
    let same_members = current.len() == column_names.len()
        && column_names
            .iter()
            .all(|name| current.iter().any(|c| names_equal(c, name, cs)));
    if !same_members {
        return Err(DdlError::InvalidState(format!(
            "Primary key of table '{}' is ({}), expected ({})",
            table.name,
            current.join(", "),
            column_names.join(", ")
        )));
    }
    Ok(())
}

/// Marks `column_names` as the primary key. Key order follows column
/// order.
fn set_primary_key(table: &mut Table, column_names: &[String], cs: bool) -> Result<()> {
    for name in column_names {
        if table.find_column(name, cs).is_none() {
            return Err(missing_column(&table.name, name));
        }
    }
    for column in &mut table.columns {
        column.primary_key = column_names
            .iter()
            .any(|name| names_equal(&column.name, name, cs));
    }
    Ok(())
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddTable { table } => write!(f, "add table {}", table.name),
            Self::RemoveTable { table_name } => write!(f, "remove table {table_name}"),
            Self::AddColumn {
                table_name, column, ..
            } => write!(f, "add column {table_name}.{}", column.name),
            Self::RemoveColumn {
                table_name,
                column_name,
            } => write!(f, "remove column {table_name}.{column_name}"),
            Self::ColumnDefinitionChange {
                table_name,
                column_name,
                ..
            } => write!(f, "change column {table_name}.{column_name}"),
            Self::ColumnAutoIncrementChange {
                table_name,
                column_name,
                auto_increment,
            } => write!(
                f,
                "set auto-increment {auto_increment} on {table_name}.{column_name}"
            ),
            Self::ColumnOrderChange { table_name, .. } => {
                write!(f, "reorder columns of {table_name}")
            }
            Self::AddPrimaryKey {
                table_name,
                column_names,
            } => write!(f, "add primary key {table_name}({})", column_names.join(", ")),
            Self::RemovePrimaryKey { table_name, .. } => {
                write!(f, "remove primary key of {table_name}")
            }
            Self::PrimaryKeyChange {
                table_name,
                new_column_names,
                ..
            } => write!(
                f,
                "change primary key {table_name}({})",
                new_column_names.join(", ")
            ),
            Self::AddIndex { table_name, index } => write!(
                f,
                "add index {} on {table_name}",
                index.name.as_deref().unwrap_or("<unnamed>")
            ),
            Self::RemoveIndex { table_name, index } => write!(
                f,
                "remove index {} on {table_name}",
                index.name.as_deref().unwrap_or("<unnamed>")
            ),
            Self::AddForeignKey {
                table_name,
                foreign_key,
            } => write!(
                f,
                "add foreign key {table_name} -> {}",
                foreign_key.foreign_table
            ),
            Self::RemoveForeignKey {
                table_name,
                foreign_key,
            } => write!(
                f,
                "remove foreign key {table_name} -> {}",
                foreign_key.foreign_table
            ),
            Self::RecreateTable {
                table_name,
                temporary_name,
                ..
            } => write!(f, "recreate table {table_name} via {temporary_name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JdbcType;

    fn db() -> Database {
        Database::new("shop")
            .table(
                Table::new("customers")
                    .column(Column::new("id", JdbcType::Integer).primary_key())
                    .column(Column::new("name", JdbcType::Varchar).size(80)),
            )
            .table(
                Table::new("orders")
                    .column(Column::new("id", JdbcType::Integer).primary_key())
                    .column(Column::new("customer_id", JdbcType::Integer))
                    .index(Index::new("idx_customer").column("customer_id"))
                    .foreign_key(
                        ForeignKey::new("customers")
                            .name("fk_customer")
                            .reference("customer_id", "id"),
                    ),
            )
    }

    #[test]
    fn test_add_table_strips_foreign_keys() {
        let table = db().tables[1].clone();
        let Change::AddTable { table } = Change::add_table(&table) else {
            panic!("expected AddTable");
        };
        assert!(table.foreign_keys.is_empty());
        assert_eq!(table.indexes.len(), 1);
    }

    #[test]
    fn test_add_duplicate_table_fails() {
        let mut db = db();
        let result = Change::add_table(&Table::new("CUSTOMERS")).apply(&mut db, false);
        assert!(matches!(result, Err(DdlError::InvalidState(_))));
        assert!(Change::add_table(&Table::new("CUSTOMERS"))
            .apply(&mut db, true)
            .is_ok());
    }

    #[test]
    fn test_add_column_positions() {
        let mut db = db();
        Change::AddColumn {
            table_name: "customers".into(),
            column: Column::new("email", JdbcType::Varchar).primary_key(),
            previous_column: Some("id".into()),
            at_end: false,
        }
        .apply(&mut db, true)
        .unwrap();
        Change::AddColumn {
            table_name: "customers".into(),
            column: Column::new("rowid", JdbcType::BigInt),
            previous_column: None,
            at_end: false,
        }
        .apply(&mut db, true)
        .unwrap();

        let table = db.find_table("customers", true).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["rowid", "id", "email", "name"]);
        assert!(!table.find_column("email", true).unwrap().primary_key);
    }

    #[test]
    fn test_remove_missing_column_fails() {
        let mut db = db();
        let result = Change::remove_column("customers", "nope").apply(&mut db, true);
        assert!(matches!(result, Err(DdlError::InvalidState(msg)) if msg.contains("nope")));
    }

    #[test]
    fn test_column_definition_change_keeps_key_flags() {
        let mut db = db();
        Change::ColumnDefinitionChange {
            table_name: "customers".into(),
            column_name: "id".into(),
            new_column: Column::new("id", JdbcType::BigInt).default_value("0"),
        }
        .apply(&mut db, true)
        .unwrap();
        let id = db.find_table("customers", true).unwrap().find_column("id", true).unwrap();
        assert_eq!(id.jdbc_type, JdbcType::BigInt);
        assert!(id.primary_key);
        assert!(!id.required);
        assert_eq!(id.default_value.as_deref(), Some("0"));
    }

    #[test]
    fn test_column_order_change() {
        let mut db = db();
        Change::ColumnOrderChange {
            table_name: "orders".into(),
            new_order: vec!["customer_id".into(), "id".into()],
        }
        .apply(&mut db, true)
        .unwrap();
        let names: Vec<_> = db.tables[1].column_names().collect();
        assert_eq!(names, vec!["customer_id", "id"]);

        let bad = Change::ColumnOrderChange {
            table_name: "orders".into(),
            new_order: vec!["id".into(), "ghost".into()],
        };
        assert!(bad.apply(&mut db, true).is_err());
        assert_eq!(db.tables[1].columns.len(), 2);
    }

    #[test]
    fn test_primary_key_changes() {
        let mut db = db();
        let change = Change::PrimaryKeyChange {
            table_name: "orders".into(),
            old_column_names: vec!["id".into()],
            new_column_names: vec!["id".into(), "customer_id".into()],
        };
        change.apply(&mut db, true).unwrap();
        assert_eq!(db.tables[1].primary_key_names(), vec!["id", "customer_id"]);

        let stale = Change::RemovePrimaryKey {
            table_name: "orders".into(),
            column_names: vec!["id".into()],
        };
        assert!(matches!(stale.apply(&mut db, true), Err(DdlError::InvalidState(_))));

        Change::RemovePrimaryKey {
            table_name: "orders".into(),
            column_names: vec!["id".into(), "customer_id".into()],
        }
        .apply(&mut db, true)
        .unwrap();
        assert!(!db.tables[1].has_primary_key());

        let add = Change::AddPrimaryKey {
            table_name: "orders".into(),
            column_names: vec!["customer_id".into()],
        };
        add.apply(&mut db, true).unwrap();
        assert!(matches!(add.apply(&mut db, true), Err(DdlError::InvalidState(_))));
    }

    #[test]
    fn test_index_and_foreign_key_removal() {
        let mut db = db();
        let fk = db.tables[1].foreign_keys[0].clone();
        Change::remove_foreign_key("orders", fk.clone())
            .apply(&mut db, true)
            .unwrap();
        assert!(Change::remove_foreign_key("orders", fk)
            .apply(&mut db, true)
            .is_err());

        let index = Index::new("idx_customer").column("customer_id");
        Change::remove_index("orders", index.clone())
            .apply(&mut db, true)
            .unwrap();
        assert!(db.tables[1].indexes.is_empty());
        Change::add_index("orders", index).apply(&mut db, true).unwrap();
        assert_eq!(db.tables[1].indexes.len(), 1);
    }

    #[test]
    fn test_add_foreign_key_requires_target_table() {
        let mut db = db();
        let fk = ForeignKey::new("suppliers").reference("customer_id", "id");
        let result = Change::add_foreign_key("orders", fk).apply(&mut db, true);
        assert!(matches!(result, Err(DdlError::InvalidState(msg)) if msg.contains("suppliers")));
    }

    #[test]
    fn test_recreate_table_keeps_foreign_keys() {
        let mut db = db();
        let target = Table::new("orders")
            .column(Column::new("id", JdbcType::BigInt).primary_key())
            .column(Column::new("customer_id", JdbcType::Integer));
        Change::RecreateTable {
            table_name: "orders".into(),
            temporary_name: "orders_".into(),
            target_table: target,
            changes: Vec::new(),
        }
        .apply(&mut db, true)
        .unwrap();
        let orders = &db.tables[1];
        assert_eq!(orders.columns[0].jdbc_type, JdbcType::BigInt);
        assert!(orders.indexes.is_empty());
        assert_eq!(orders.foreign_keys.len(), 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let change = Change::remove_column("orders", "customer_id");
        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains("RemoveColumn"));
        let back: Change = serde_json::from_str(&json).unwrap();
        assert_eq!(back, change);
        assert_eq!(back.table_name(), "orders");
        assert_eq!(back.to_string(), "remove column orders.customer_id");
    }
}
