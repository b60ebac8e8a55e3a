use serde::{Deserialize, Serialize};

use super::{names_equal, Table};

/// The complete database schema (all tables).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Schema name.
    #[serde(default)]
    pub name: String,
    /// All tables in the database, in declaration order.
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Database {
    /// Creates a new empty database schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Adds a table to the schema.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Gets a table by name.
    #[must_use]
    pub fn find_table(&self, name: &str, case_sensitive: bool) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| names_equal(&t.name, name, case_sensitive))
    }

    /// Gets a mutable table by name.
    #[must_use]
    pub fn find_table_mut(&mut self, name: &str, case_sensitive: bool) -> Option<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| names_equal(&t.name, name, case_sensitive))
    }

    /// Position of a table.
    #[must_use]
    pub fn table_position(&self, name: &str, case_sensitive: bool) -> Option<usize> {
        self.tables
            .iter()
            .position(|t| names_equal(&t.name, name, case_sensitive))
    }

    /// Whether both databases contain structurally equal tables. Table
    /// order is ignored; column order is not.
    #[must_use]
    pub fn same_structure(&self, other: &Self, case_sensitive: bool) -> bool {
        self.tables.len() == other.tables.len()
            && self.tables.iter().all(|table| {
                other
                    .find_table(&table.name, case_sensitive)
                    .is_some_and(|o| table.same_structure(o, case_sensitive))
            })
    }
}
