use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};

use super::{name_lists_equal, names_equal, optional_names_match};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum IndexKind {
    #[default]
    Regular,
    Unique,
}

/// Schema definition for an index.
///
/// An index built with [`Index::unique`] is a unique index: it stays
/// unique for its whole life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Columns included in the index, in order.
    pub columns: Vec<String>,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    kind: IndexKind,
}

impl Index {
    /// Creates a non-unique index.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            columns: Vec::new(),
            unique: false,
            kind: IndexKind::Regular,
        }
    }

    /// Creates a unique index.
    #[must_use]
    pub fn unique(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            columns: Vec::new(),
            unique: true,
            kind: IndexKind::Unique,
        }
    }

    /// Removes the name.
    #[must_use]
    pub fn unnamed(mut self) -> Self {
        self.name = None;
        self
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Whether the index enforces uniqueness.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.kind == IndexKind::Unique || self.unique
    }

    /// Changes the uniqueness flag. Unique indexes reject `false`.
    pub fn set_unique(&mut self, unique: bool) -> Result<()> {
        if self.kind == IndexKind::Unique && !unique {
            return Err(DdlError::InvalidIndexState(
                self.name.clone().unwrap_or_default(),
            ));
        }
        self.unique = unique;
        Ok(())
    }

    /// Whether the index covers `column`.
    #[must_use]
    pub fn has_column(&self, column: &str, case_sensitive: bool) -> bool {
        self.columns
            .iter()
            .any(|c| names_equal(c, column, case_sensitive))
    }

    /// Two indexes are equivalent if they cover the same columns in the
    /// same order with the same uniqueness. Names only matter when both
    /// sides have one.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self, case_sensitive: bool) -> bool {
        self.is_unique() == other.is_unique()
            && name_lists_equal(&self.columns, &other.columns, case_sensitive)
            && optional_names_match(self.name.as_deref(), other.name.as_deref(), case_sensitive)
    }
}
