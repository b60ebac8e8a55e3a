use std::fmt;

use serde::{Deserialize, Serialize};

use super::{names_equal, optional_names_match};

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    /// No action (error if referenced row is deleted/updated).
    #[default]
    NoAction,
    /// Restrict (same as NoAction but checked immediately).
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the foreign key column to NULL.
    SetNull,
    /// Set the foreign key column to its default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Every action.
    pub const ALL: [Self; 5] = [
        Self::NoAction,
        Self::Restrict,
        Self::Cascade,
        Self::SetNull,
        Self::SetDefault,
    ];

    /// Returns the SQL representation of this action.
    #[must_use]
    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

impl fmt::Display for ForeignKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

/// One local column → foreign column pair of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Column in the referencing table.
    pub local_column: String,
    /// Column in the referenced table.
    pub foreign_column: String,
}

impl Reference {
    /// Creates a reference.
    #[must_use]
    pub fn new(local_column: impl Into<String>, foreign_column: impl Into<String>) -> Self {
        Self {
            local_column: local_column.into(),
            foreign_column: foreign_column.into(),
        }
    }
}

/// Schema definition for a foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Referenced table name.
    pub foreign_table: String,
    /// Column pairs, in order.
    pub references: Vec<Reference>,
    /// Action on update.
    #[serde(default)]
    pub on_update: ForeignKeyAction,
    /// Action on delete.
    #[serde(default)]
    pub on_delete: ForeignKeyAction,
}

impl ForeignKey {
    /// Creates an unnamed foreign key to `foreign_table`.
    #[must_use]
    pub fn new(foreign_table: impl Into<String>) -> Self {
        Self {
            name: None,
            foreign_table: foreign_table.into(),
            references: Vec::new(),
            on_update: ForeignKeyAction::NoAction,
            on_delete: ForeignKeyAction::NoAction,
        }
    }

    /// Sets the constraint name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a column pair.
    #[must_use]
    pub fn reference(
        mut self,
        local_column: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Self {
        self.references
            .push(Reference::new(local_column, foreign_column));
        self
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = action;
        self
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Local column names, in order.
    pub fn local_columns(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(|r| r.local_column.as_str())
    }

    /// Foreign column names, in order.
    pub fn foreign_columns(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(|r| r.foreign_column.as_str())
    }

    /// Whether `column` is one of the local columns.
    #[must_use]
    pub fn has_local_column(&self, column: &str, case_sensitive: bool) -> bool {
        self.local_columns()
            .any(|c| names_equal(c, column, case_sensitive))
    }

    /// Whether `column` is one of the foreign columns.
    #[must_use]
    pub fn has_foreign_column(&self, column: &str, case_sensitive: bool) -> bool {
        self.foreign_columns()
            .any(|c| names_equal(c, column, case_sensitive))
    }

    /// Whether this key references `table`.
    #[must_use]
    pub fn references_table(&self, table: &str, case_sensitive: bool) -> bool {
        names_equal(&self.foreign_table, table, case_sensitive)
    }

    /// Two foreign keys are equivalent if they reference the same table
    /// through the same column pairs with the same actions. Names only
    /// matter when both sides have one.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self, case_sensitive: bool) -> bool {
        names_equal(&self.foreign_table, &other.foreign_table, case_sensitive)
            && self.on_update == other.on_update
            && self.on_delete == other.on_delete
            && self.references.len() == other.references.len()
            && self.references.iter().zip(&other.references).all(|(a, b)| {
                names_equal(&a.local_column, &b.local_column, case_sensitive)
                    && names_equal(&a.foreign_column, &b.foreign_column, case_sensitive)
            })
            && optional_names_match(self.name.as_deref(), other.name.as_deref(), case_sensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_fk() -> ForeignKey {
        ForeignKey::new("authors")
            .name("fk_book_author")
            .reference("author_id", "id")
            .on_delete(ForeignKeyAction::Cascade)
    }

    #[test]
    fn test_column_membership() {
        let fk = author_fk();
        assert!(fk.has_local_column("AUTHOR_ID", false));
        assert!(!fk.has_local_column("AUTHOR_ID", true));
        assert!(fk.has_foreign_column("id", true));
        assert!(fk.references_table("Authors", false));
    }

    #[test]
    fn test_equivalence() {
        let a = author_fk();
        assert!(a.is_equivalent(&a.clone(), true));

        let mut unnamed = author_fk();
        unnamed.name = None;
        assert!(a.is_equivalent(&unnamed, true));

        let other_action = author_fk().on_delete(ForeignKeyAction::SetNull);
        assert!(!a.is_equivalent(&other_action, true));

        let other_column = ForeignKey::new("authors")
            .name("fk_book_author")
            .reference("editor_id", "id")
            .on_delete(ForeignKeyAction::Cascade);
        assert!(!a.is_equivalent(&other_column, true));
    }

    #[test]
    fn test_action_sql() {
        assert_eq!(ForeignKeyAction::SetNull.to_sql(), "SET NULL");
        assert_eq!(ForeignKeyAction::default(), ForeignKeyAction::NoAction);
    }
}
