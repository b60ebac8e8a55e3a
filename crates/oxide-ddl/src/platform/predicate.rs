//! Policy deciding whether table definition changes can be applied in
//! place or require the table to be rebuilt.

use std::fmt;
use std::sync::Arc;

use crate::changes::Change;
use crate::model::{Column, Table};

use super::{ColumnAlterSupport, PlatformInfo};

/// Decides which definition changes a platform applies with ALTER.
pub trait TableDefinitionChangesPredicate: Send + Sync + fmt::Debug {
    /// Whether `change` can be applied to `table` in place.
    fn is_supported(&self, table: &Table, change: &Change) -> bool;

    /// Whether the whole set can be applied in place. When this returns
    /// `false` the table is rebuilt instead. Changes that do not touch the
    /// table definition are not judged.
    fn are_supported(&self, table: &Table, changes: &[Change]) -> bool {
        changes
            .iter()
            .filter(|change| change.is_table_definition_change())
            .all(|change| self.is_supported(table, change))
    }
}

/// The capability-driven policy every built-in platform uses.
#[derive(Debug, Clone)]
pub struct DefaultTableDefinitionChangesPredicate {
    info: Arc<PlatformInfo>,
}

impl DefaultTableDefinitionChangesPredicate {
    /// Creates the policy for a platform.
    #[must_use]
    pub fn new(info: Arc<PlatformInfo>) -> Self {
        Self { info }
    }

    fn is_widening(old: &Column, new: &Column) -> bool {
        let same_or_wider = old.jdbc_type == new.jdbc_type
            || old
                .jdbc_type
                .family()
                .is_some_and(|f| {
                    new.jdbc_type.family() == Some(f) && f.is_widening(old.jdbc_type, new.jdbc_type)
                });
        let size_ok = match (old.size, new.size) {
            (Some(old), Some(new)) => new >= old,
            (Some(_), None) => false,
            (None, _) => true,
        };
        let scale_ok = old.scale.unwrap_or(0) <= new.scale.unwrap_or(0);
        same_or_wider && size_ok && scale_ok && (old.required || !new.required)
    }

    /// Removing a primary key column together with a key change is only
    /// possible on platforms that can drop key columns.
    fn removes_key_column_while_changing_key(table: &Table, changes: &[Change]) -> bool {
        let changes_key = changes.iter().any(|c| {
            matches!(
                c,
                Change::RemovePrimaryKey { .. }
                    | Change::PrimaryKeyChange { .. }
                    | Change::AddPrimaryKey { .. }
            )
        });
        changes_key
            && changes.iter().any(|c| match c {
                Change::RemoveColumn { column_name, .. } => {
                    find_column(table, column_name).is_some_and(|col| col.primary_key)
                }
                _ => false,
            })
    }
}

fn find_column<'a>(table: &'a Table, name: &str) -> Option<&'a Column> {
    table
        .find_column(name, true)
        .or_else(|| table.find_column(name, false))
}

impl TableDefinitionChangesPredicate for DefaultTableDefinitionChangesPredicate {
    fn is_supported(&self, table: &Table, change: &Change) -> bool {
        let info = &self.info;
        match change {
            Change::RemoveColumn { .. }
            | Change::AddPrimaryKey { .. }
            | Change::PrimaryKeyChange { .. }
            | Change::RemovePrimaryKey { .. } => true,

            Change::AddColumn { column, at_end, .. } => {
                (*at_end || info.positional_add_column_supported)
                    && (!column.required
                        || column.default_value.is_some()
                        || info.add_required_column_without_default_supported)
                    && (!column.auto_increment || info.add_auto_increment_column_supported)
            }

            Change::ColumnDefinitionChange {
                column_name,
                new_column,
                ..
            } => match info.column_alter {
                ColumnAlterSupport::Full => true,
                ColumnAlterSupport::None => false,
                ColumnAlterSupport::WideningOnly => find_column(table, column_name)
                    .is_some_and(|old| Self::is_widening(old, new_column)),
            },

            Change::ColumnAutoIncrementChange { .. } => info.auto_increment_change_supported,
            Change::ColumnOrderChange { .. } => info.column_reorder_supported,

            _ => false,
        }
    }

    fn are_supported(&self, table: &Table, changes: &[Change]) -> bool {
        if !self.info.primary_key_column_drop_supported
            && Self::removes_key_column_while_changing_key(table, changes)
        {
            return false;
        }
        changes
            .iter()
            .filter(|change| change.is_table_definition_change())
            .all(|change| self.is_supported(table, change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Index;
    use crate::types::JdbcType;

    fn table() -> Table {
        Table::new("accounts")
            .column(Column::new("id", JdbcType::Integer).primary_key())
            .column(Column::new("name", JdbcType::Varchar).size(50).required())
    }

    fn predicate(configure: impl FnOnce(&mut PlatformInfo)) -> DefaultTableDefinitionChangesPredicate {
        let mut info = PlatformInfo::new("Test");
        configure(&mut info);
        DefaultTableDefinitionChangesPredicate::new(Arc::new(info))
    }

    fn add_column(column: Column, at_end: bool) -> Change {
        Change::AddColumn {
            table_name: "accounts".into(),
            column,
            previous_column: Some("id".into()),
            at_end,
        }
    }

    #[test]
    fn test_baseline_changes_supported() {
        let p = predicate(|_| {});
        let t = table();
        assert!(p.is_supported(&t, &Change::remove_column("accounts", "name")));
        assert!(p.is_supported(
            &t,
            &Change::RemovePrimaryKey {
                table_name: "accounts".into(),
                column_names: vec!["id".into()],
            }
        ));
        assert!(!p.is_supported(&t, &Change::remove_table("accounts")));
        // Index changes are applied around the definition changes.
        assert!(p.are_supported(
            &t,
            &[
                Change::remove_index("accounts", Index::new("idx_name").column("name")),
                Change::remove_column("accounts", "name"),
            ]
        ));
    }

    #[test]
    fn test_add_column_rules() {
        let p = predicate(|_| {});
        let t = table();
        assert!(p.is_supported(&t, &add_column(Column::new("note", JdbcType::Varchar), true)));
        assert!(!p.is_supported(&t, &add_column(Column::new("note", JdbcType::Varchar), false)));
        assert!(!p.is_supported(
            &t,
            &add_column(Column::new("code", JdbcType::Integer).required(), true)
        ));
        assert!(p.is_supported(
            &t,
            &add_column(Column::new("code", JdbcType::Integer).required().default_value("0"), true)
        ));
        assert!(!p.is_supported(
            &t,
            &add_column(Column::new("seq", JdbcType::Integer).auto_increment(), true)
        ));

        let p = predicate(|info| {
            info.positional_add_column_supported = true;
            info.add_auto_increment_column_supported = true;
        });
        assert!(p.is_supported(&t, &add_column(Column::new("note", JdbcType::Varchar), false)));
        assert!(p.is_supported(
            &t,
            &add_column(Column::new("seq", JdbcType::Integer).auto_increment(), true)
        ));
    }

    #[test]
    fn test_widening_only_alter() {
        let p = predicate(|info| info.column_alter = ColumnAlterSupport::WideningOnly);
        let t = table();
        let change = |column: Column| Change::ColumnDefinitionChange {
            table_name: "accounts".into(),
            column_name: "name".into(),
            new_column: column,
        };
        assert!(p.is_supported(&t, &change(Column::new("name", JdbcType::Varchar).size(80))));
        assert!(p.is_supported(&t, &change(Column::new("name", JdbcType::LongVarchar).size(80))));
        assert!(!p.is_supported(&t, &change(Column::new("name", JdbcType::Varchar).size(20).required())));
        assert!(!p.is_supported(&t, &change(Column::new("name", JdbcType::Integer).size(80))));

        let id_change = Change::ColumnDefinitionChange {
            table_name: "accounts".into(),
            column_name: "id".into(),
            new_column: Column::new("id", JdbcType::SmallInt).required(),
        };
        assert!(!p.is_supported(&t, &id_change));

        let p = predicate(|info| info.column_alter = ColumnAlterSupport::None);
        assert!(!p.is_supported(&t, &change(Column::new("name", JdbcType::Varchar).size(80))));
    }

    #[test]
    fn test_auto_increment_change_forces_rebuild_of_whole_set() {
        let p = predicate(|_| {});
        let t = table();
        let changes = vec![
            Change::ColumnDefinitionChange {
                table_name: "accounts".into(),
                column_name: "name".into(),
                new_column: Column::new("name", JdbcType::Varchar).size(80),
            },
            Change::ColumnAutoIncrementChange {
                table_name: "accounts".into(),
                column_name: "id".into(),
                auto_increment: true,
            },
        ];
        assert!(p.are_supported(&t, &changes[..1]));
        assert!(!p.are_supported(&t, &changes));
    }

    #[test]
    fn test_key_column_drop_restriction() {
        let t = Table::new("lines")
            .column(Column::new("order_id", JdbcType::Integer).primary_key())
            .column(Column::new("line_no", JdbcType::Integer).primary_key())
            .column(Column::new("qty", JdbcType::Integer));
        let changes = vec![
            Change::PrimaryKeyChange {
                table_name: "lines".into(),
                old_column_names: vec!["order_id".into(), "line_no".into()],
                new_column_names: vec!["order_id".into()],
            },
            Change::remove_column("lines", "line_no"),
        ];
        assert!(predicate(|_| {}).are_supported(&t, &changes));
        let restrictive = predicate(|info| info.primary_key_column_drop_supported = false);
        assert!(!restrictive.are_supported(&t, &changes));
        assert!(restrictive.are_supported(&t, &[Change::remove_column("lines", "qty")]));
    }
}
