//! Model comparison.
//!
//! Computes the ordered changes that turn a source model into a target
//! model. Tables present in both models are planned independently (in
//! parallel) and the plans are then emitted in source declaration order
//! against a working copy of the source, so each change is valid for the
//! state the previous ones left behind:
//!
//! 1. foreign keys that would block later steps are removed,
//! 2. tables missing from the target are removed,
//! 3. per table: indexes removed, columns and primary key changed (or the
//!    table rebuilt), indexes added,
//! 4. new tables are added,
//! 5. missing foreign keys are added.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::changes::Change;
use crate::error::Result;
use crate::model::{name_lists_equal, names_equal, Column, Database, ForeignKey, Index, Table};
use crate::platform::{PlatformInfo, TableDefinitionChangesPredicate};

/// What has to happen to one table present in both models.
#[derive(Debug, Clone)]
struct TablePlan {
    source_name: String,
    target: Table,
    removed_indexes: Vec<Index>,
    added_indexes: Vec<Index>,
    definition_changes: Vec<Change>,
    /// Columns removed or whose type, size or scale changes.
    retyped_columns: Vec<String>,
    old_primary_key: Vec<String>,
    primary_key_changed: bool,
    rebuild: bool,
}

impl TablePlan {
    fn is_retyped(&self, column: &str, case_sensitive: bool) -> bool {
        self.retyped_columns
            .iter()
            .any(|c| names_equal(c, column, case_sensitive))
    }
}

/// Compares two models for one platform.
#[derive(Debug, Clone, Copy)]
pub struct ModelComparator<'a> {
    info: &'a PlatformInfo,
    predicate: &'a dyn TableDefinitionChangesPredicate,
    case_sensitive: bool,
}

impl<'a> ModelComparator<'a> {
    /// Creates a comparator.
    #[must_use]
    pub fn new(
        info: &'a PlatformInfo,
        predicate: &'a dyn TableDefinitionChangesPredicate,
        case_sensitive: bool,
    ) -> Self {
        Self {
            info,
            predicate,
            case_sensitive,
        }
    }

    /// Returns the changes that turn `source` into `target`. Neither
    /// input is modified.
    pub fn compare(&self, source: &Database, target: &Database) -> Result<Vec<Change>> {
        let cs = self.case_sensitive;
        let removed: Vec<&Table> = source
            .tables
            .iter()
            .filter(|t| target.find_table(&t.name, cs).is_none())
            .collect();
        let added: Vec<&Table> = target
            .tables
            .iter()
            .filter(|t| source.find_table(&t.name, cs).is_none())
            .collect();
        let pairs: Vec<(&Table, &Table)> = source
            .tables
            .iter()
            .filter_map(|s| target.find_table(&s.name, cs).map(|t| (s, t)))
            .collect();

        info!(
            source = %source.name,
            target = %target.name,
            added = added.len(),
            removed = removed.len(),
            compared = pairs.len(),
            "Comparing models"
        );

        let scope = source.tables.iter().map(|t| self.key(&t.name)).collect();
        let readd = target.tables.iter().map(|t| self.key(&t.name)).collect();
        let changes = self.emit(source, target, &pairs, &removed, &added, &scope, &readd)?;
        info!(changes = changes.len(), "Comparison finished");
        Ok(changes)
    }

    /// Returns the changes for a single table present in both models.
    /// Foreign keys of other tables are only touched when this table's
    /// changes would break them, and are re-added afterwards.
    pub fn compare_tables(
        &self,
        source_model: &Database,
        source_table: &Table,
        target_model: &Database,
        target_table: &Table,
    ) -> Result<Vec<Change>> {
        let scope: HashSet<String> = HashSet::from([self.key(&source_table.name)]);
        let readd = HashSet::from([self.key(&target_table.name)]);
        self.emit(
            source_model,
            target_model,
            &[(source_table, target_table)],
            &[],
            &[],
            &scope,
            &readd,
        )
    }

    fn key(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        source: &Database,
        target: &Database,
        pairs: &[(&Table, &Table)],
        removed: &[&Table],
        added: &[&Table],
        scope: &HashSet<String>,
        readd: &HashSet<String>,
    ) -> Result<Vec<Change>> {
        let cs = self.case_sensitive;
        let mut working = source.clone();
        let mut changes = Vec::new();

        let mut plans: Vec<TablePlan> = pairs
            .par_iter()
            .map(|(s, t)| self.plan_table(s, t))
            .collect();
        let removed_keys: HashSet<String> = removed.iter().map(|t| self.key(&t.name)).collect();

        // Rebuilds are decided against each table as it looks once the
        // foreign keys blocking its in-place changes are gone.
        let blocking = self.foreign_keys_to_drop(source, target, &plans, &removed_keys, scope);
        plans.par_iter_mut().for_each(|plan| {
            if let Some(table) = source.find_table(&plan.source_name, cs) {
                let intermediate = self.without_foreign_keys(table, &blocking);
                plan.rebuild = !plan.definition_changes.is_empty()
                    && !self.predicate.are_supported(&intermediate, &plan.definition_changes);
            }
            debug!(
                table = %plan.source_name,
                removed_indexes = plan.removed_indexes.len(),
                added_indexes = plan.added_indexes.len(),
                definition_changes = plan.definition_changes.len(),
                rebuild = plan.rebuild,
                "Planned table"
            );
        });

        let dropped = self.foreign_keys_to_drop(source, target, &plans, &removed_keys, scope);
        for (owner, fk) in &dropped {
            push(
                &mut working,
                &mut changes,
                Change::remove_foreign_key(owner, fk.clone()),
                cs,
            )?;
        }

        for table in removed {
            push(&mut working, &mut changes, Change::remove_table(&table.name), cs)?;
        }

        for plan in &plans {
            if plan.rebuild {
                debug!(
                    table = %plan.source_name,
                    changes = plan.definition_changes.len(),
                    "Changes not supported in place, rebuilding table"
                );
                let change = Change::RecreateTable {
                    table_name: plan.source_name.clone(),
                    temporary_name: self.info.shorten_name(&format!("{}_", plan.source_name)),
                    target_table: plan.target.clone(),
                    changes: plan.definition_changes.clone(),
                };
                push(&mut working, &mut changes, change, cs)?;
                continue;
            }
            for index in &plan.removed_indexes {
                let change = Change::remove_index(&plan.source_name, index.clone());
                push(&mut working, &mut changes, change, cs)?;
            }
            for change in &plan.definition_changes {
                push(&mut working, &mut changes, change.clone(), cs)?;
            }
            for index in &plan.added_indexes {
                let change = Change::add_index(&plan.source_name, index.clone());
                push(&mut working, &mut changes, change, cs)?;
            }
        }

        for table in added {
            push(&mut working, &mut changes, Change::add_table(table), cs)?;
        }

        for table in &target.tables {
            if readd.contains(&self.key(&table.name)) {
                for fk in &table.foreign_keys {
                    add_missing_foreign_key(&mut working, &mut changes, &table.name, fk, cs)?;
                }
            }
        }
        // Dropped keys of tables outside the comparison come back unchanged.
        for (owner, fk) in &dropped {
            let owner_key = self.key(owner);
            if !readd.contains(&owner_key) && !removed_keys.contains(&owner_key) {
                add_missing_foreign_key(&mut working, &mut changes, owner, fk, cs)?;
            }
        }

        Ok(changes)
    }

    /// Foreign keys, with their owning table, that have to be removed
    /// before the planned changes can be applied.
    fn foreign_keys_to_drop(
        &self,
        source: &Database,
        target: &Database,
        plans: &[TablePlan],
        removed: &HashSet<String>,
        scope: &HashSet<String>,
    ) -> Vec<(String, ForeignKey)> {
        let plan_index: HashMap<String, &TablePlan> = plans
            .iter()
            .map(|p| (self.key(&p.source_name), p))
            .collect();
        source
            .tables
            .iter()
            .flat_map(|table| table.foreign_keys.iter().map(move |fk| (table, fk)))
            .filter(|(table, fk)| {
                self.must_drop_foreign_key(table, fk, target, &plan_index, removed, scope)
            })
            .map(|(table, fk)| (table.name.clone(), fk.clone()))
            .collect()
    }

    fn without_foreign_keys(&self, table: &Table, dropped: &[(String, ForeignKey)]) -> Table {
        let owner = self.key(&table.name);
        let mut table = table.clone();
        table
            .foreign_keys
            .retain(|fk| !dropped.iter().any(|(o, d)| self.key(o) == owner && d == fk));
        table
    }

    fn is_system_index(&self, index: &Index) -> bool {
        index
            .name
            .as_deref()
            .is_some_and(|name| self.info.is_system_index_name(name))
    }

    /// Size that matters for comparison: only types with a size or
    /// precision have one, falling back to the platform default.
    fn effective_size(&self, column: &Column) -> Option<u64> {
        let t = column.jdbc_type;
        if self.info.has_size(t) || self.info.has_precision_and_scale(t) {
            column.size.or_else(|| self.info.default_size(t))
        } else {
            None
        }
    }

    fn effective_scale(&self, column: &Column) -> u32 {
        if self.info.has_precision_and_scale(column.jdbc_type) {
            column.scale.unwrap_or(0)
        } else {
            0
        }
    }

    fn column_type_changed(&self, source: &Column, target: &Column) -> bool {
        source.type_code() != target.type_code()
            || self.effective_size(source) != self.effective_size(target)
            || self.effective_scale(source) != self.effective_scale(target)
    }

    fn column_definition_changed(&self, source: &Column, target: &Column) -> bool {
        self.column_type_changed(source, target)
            || source.required != target.required
            || source.parsed_default() != target.parsed_default()
    }

    fn plan_table(&self, source: &Table, target: &Table) -> TablePlan {
        let cs = self.case_sensitive;
        let table_name = &source.name;

        let removed_indexes: Vec<Index> = source
            .indexes
            .iter()
            .filter(|i| !self.is_system_index(i) && target.find_index(i, cs).is_none())
            .cloned()
            .collect();
        let added_indexes: Vec<Index> = target
            .indexes
            .iter()
            .filter(|i| !self.is_system_index(i) && source.find_index(i, cs).is_none())
            .cloned()
            .collect();

        let mut definition_changes = Vec::new();
        let mut retyped_columns = Vec::new();

        let source_pk = source.primary_key_names();
        let target_pk = target.primary_key_names();
        let primary_key_changed = !name_lists_equal(&source_pk, &target_pk, cs);
        let pk_loses_column = source_pk
            .iter()
            .any(|name| target.find_column(name, cs).is_none());

        let mut late_pk_change = None;
        if primary_key_changed {
            match (source_pk.is_empty(), target_pk.is_empty()) {
                (false, true) => definition_changes.push(Change::RemovePrimaryKey {
                    table_name: table_name.clone(),
                    column_names: source_pk.clone(),
                }),
                (false, false) if pk_loses_column => {
                    definition_changes.push(Change::RemovePrimaryKey {
                        table_name: table_name.clone(),
                        column_names: source_pk.clone(),
                    });
                    late_pk_change = Some(Change::AddPrimaryKey {
                        table_name: table_name.clone(),
                        column_names: target_pk.clone(),
                    });
                }
                (false, false) => {
                    late_pk_change = Some(Change::PrimaryKeyChange {
                        table_name: table_name.clone(),
                        old_column_names: source_pk.clone(),
                        new_column_names: target_pk.clone(),
                    });
                }
                (true, _) => {
                    late_pk_change = Some(Change::AddPrimaryKey {
                        table_name: table_name.clone(),
                        column_names: target_pk.clone(),
                    });
                }
            }
        }

        for column in &source.columns {
            if target.find_column(&column.name, cs).is_none() {
                retyped_columns.push(column.name.clone());
                definition_changes.push(Change::remove_column(table_name, &column.name));
            }
        }

        let mut order: Vec<String> = source
            .columns
            .iter()
            .filter(|c| target.find_column(&c.name, cs).is_some())
            .map(|c| c.name.clone())
            .collect();
        for (idx, column) in target.columns.iter().enumerate() {
            if source.find_column(&column.name, cs).is_some() {
                continue;
            }
            let previous_column = idx
                .checked_sub(1)
                .map(|prev| target.columns[prev].name.clone());
            let position = previous_column.as_ref().map_or(0, |prev| {
                order
                    .iter()
                    .position(|n| names_equal(n, prev, cs))
                    .map_or(order.len(), |p| p + 1)
            });
            let at_end = position == order.len();
            order.insert(position, column.name.clone());

            let mut column = column.clone();
            column.primary_key = false;
            definition_changes.push(Change::AddColumn {
                table_name: table_name.clone(),
                column,
                previous_column,
                at_end,
            });
        }

        for target_column in &target.columns {
            let Some(source_column) = source.find_column(&target_column.name, cs) else {
                continue;
            };
            if self.column_type_changed(source_column, target_column) {
                retyped_columns.push(source_column.name.clone());
            }
            if self.column_definition_changed(source_column, target_column) {
                trace!(table = %table_name, column = %source_column.name, "Column definition changed");
                definition_changes.push(Change::ColumnDefinitionChange {
                    table_name: table_name.clone(),
                    column_name: source_column.name.clone(),
                    new_column: target_column.clone(),
                });
            }
            if source_column.auto_increment != target_column.auto_increment {
                definition_changes.push(Change::ColumnAutoIncrementChange {
                    table_name: table_name.clone(),
                    column_name: source_column.name.clone(),
                    auto_increment: target_column.auto_increment,
                });
            }
        }

        let target_order: Vec<String> = target.column_names().map(str::to_string).collect();
        if !name_lists_equal(&order, &target_order, cs) {
            definition_changes.push(Change::ColumnOrderChange {
                table_name: table_name.clone(),
                new_order: target_order,
            });
        }

        definition_changes.extend(late_pk_change);

        TablePlan {
            source_name: table_name.clone(),
            target: Table {
                foreign_keys: Vec::new(),
                ..target.clone()
            },
            removed_indexes,
            added_indexes,
            definition_changes,
            retyped_columns,
            old_primary_key: source_pk,
            primary_key_changed,
            rebuild: false,
        }
    }

    fn must_drop_foreign_key(
        &self,
        owner: &Table,
        fk: &ForeignKey,
        target: &Database,
        plans: &HashMap<String, &TablePlan>,
        removed: &HashSet<String>,
        scope: &HashSet<String>,
    ) -> bool {
        let cs = self.case_sensitive;
        let owner_key = self.key(&owner.name);
        let foreign_key = self.key(&fk.foreign_table);

        if removed.contains(&owner_key) || removed.contains(&foreign_key) {
            return true;
        }
        if scope.contains(&owner_key) {
            let kept = target
                .find_table(&owner.name, cs)
                .is_some_and(|t| t.find_foreign_key(fk, cs).is_some());
            if !kept {
                return true;
            }
        }

        if let Some(plan) = plans.get(&owner_key) {
            if plan.rebuild
                || plan
                    .retyped_columns
                    .iter()
                    .any(|c| fk.has_local_column(c, cs))
            {
                return true;
            }
            if self.info.recreate_foreign_keys_on_index_drop
                && plan
                    .removed_indexes
                    .iter()
                    .any(|i| fk.local_columns().all(|c| i.has_column(c, cs)))
            {
                return true;
            }
        }

        if let Some(plan) = plans.get(&foreign_key) {
            if plan.rebuild || fk.foreign_columns().any(|c| plan.is_retyped(c, cs)) {
                return true;
            }
            let uses_old_key = plan
                .old_primary_key
                .iter()
                .any(|k| fk.has_foreign_column(k, cs));
            if plan.primary_key_changed && uses_old_key {
                return true;
            }
            if plan
                .removed_indexes
                .iter()
                .any(|i| fk.foreign_columns().any(|c| i.has_column(c, cs)))
            {
                return true;
            }
        }

        false
    }
}

fn add_missing_foreign_key(
    working: &mut Database,
    changes: &mut Vec<Change>,
    table_name: &str,
    fk: &ForeignKey,
    case_sensitive: bool,
) -> Result<()> {
    let present = working
        .find_table(table_name, case_sensitive)
        .is_some_and(|t| t.find_foreign_key(fk, case_sensitive).is_some());
    if present {
        return Ok(());
    }
    let change = Change::add_foreign_key(table_name, fk.clone());
    push(working, changes, change, case_sensitive)
}

fn push(
    working: &mut Database,
    changes: &mut Vec<Change>,
    change: Change,
    case_sensitive: bool,
) -> Result<()> {
    trace!(change = %change, "Emitting change");
    change.apply(working, case_sensitive)?;
    changes.push(change);
    Ok(())
}
