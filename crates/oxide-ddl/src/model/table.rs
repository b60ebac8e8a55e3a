use serde::{Deserialize, Serialize};

use super::{names_equal, Column, ForeignKey, Index};

/// Complete schema definition for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Column definitions, in declaration order.
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Index definitions.
    #[serde(default)]
    pub indexes: Vec<Index>,
    /// Foreign key definitions.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Creates a new table schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Adds a column to the table.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn find_column(&self, name: &str, case_sensitive: bool) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| names_equal(&c.name, name, case_sensitive))
    }

    /// Gets a mutable column by name.
    #[must_use]
    pub fn find_column_mut(&mut self, name: &str, case_sensitive: bool) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| names_equal(&c.name, name, case_sensitive))
    }

    /// Position of a column.
    #[must_use]
    pub fn column_position(&self, name: &str, case_sensitive: bool) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| names_equal(&c.name, name, case_sensitive))
    }

    /// Column names, in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Primary key columns, in column order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Primary key column names, in column order.
    #[must_use]
    pub fn primary_key_names(&self) -> Vec<String> {
        self.primary_key_columns().map(|c| c.name.clone()).collect()
    }

    /// Whether the table has a primary key.
    #[must_use]
    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.primary_key)
    }

    /// Finds an equivalent index.
    #[must_use]
    pub fn find_index(&self, index: &Index, case_sensitive: bool) -> Option<&Index> {
        self.indexes
            .iter()
            .find(|i| i.is_equivalent(index, case_sensitive))
    }

    /// Finds an equivalent foreign key.
    #[must_use]
    pub fn find_foreign_key(&self, fk: &ForeignKey, case_sensitive: bool) -> Option<&ForeignKey> {
        self.foreign_keys
            .iter()
            .find(|f| f.is_equivalent(fk, case_sensitive))
    }

    /// Whether both tables describe the same structure. Columns are
    /// compared in order; indexes and foreign keys as unordered sets.
    #[must_use]
    pub fn same_structure(&self, other: &Self, case_sensitive: bool) -> bool {
        names_equal(&self.name, &other.name, case_sensitive)
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.same_structure(b, case_sensitive))
            && self.indexes.len() == other.indexes.len()
            && self.indexes.iter().all(|i| {
                other.indexes.iter().any(|o| {
                    o.is_equivalent(i, case_sensitive)
                        && o.name.is_some() == i.name.is_some()
                })
            })
            && self.foreign_keys.len() == other.foreign_keys.len()
            && self.foreign_keys.iter().all(|fk| {
                other.foreign_keys.iter().any(|o| {
                    o.is_equivalent(fk, case_sensitive) && o.name.is_some() == fk.name.is_some()
                })
            })
    }
}
