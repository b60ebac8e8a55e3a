#![allow(dead_code)]

use std::sync::Arc;

use oxide_ddl::prelude::*;

pub fn platform(name: &str) -> Arc<Platform> {
    PlatformRegistry::with_builtin_platforms()
        .unwrap_or_else(|e| panic!("Failed to build platforms: {e}"))
        .get(name)
        .unwrap_or_else(|e| panic!("Failed to get platform {name}: {e}"))
}

pub fn all_platforms() -> Vec<Arc<Platform>> {
    let registry = PlatformRegistry::with_builtin_platforms()
        .unwrap_or_else(|e| panic!("Failed to build platforms: {e}"));
    registry
        .names()
        .into_iter()
        .map(|name| registry.get(name).unwrap())
        .collect()
}

/// Compares on `platform` and checks that replaying the changes on a copy
/// of `source` yields `target`.
pub fn diff(platform: &Platform, source: &Database, target: &Database) -> Vec<Change> {
    let changes = platform
        .model_comparator(false)
        .compare(source, target)
        .unwrap_or_else(|e| panic!("Failed to compare on {}: {e}", platform.name()));
    let mut replay = source.clone();
    for change in &changes {
        change
            .apply(&mut replay, false)
            .unwrap_or_else(|e| panic!("Failed to apply {change} on {}: {e}", platform.name()));
    }
    assert!(
        replay.same_structure(target, false),
        "{}: replayed model differs from target\n{changes:#?}",
        platform.name()
    );
    changes
}

/// Changes with the contents of table rebuilds inlined.
pub fn flatten(changes: &[Change]) -> Vec<Change> {
    let mut flat = Vec::new();
    for change in changes {
        match change {
            Change::RecreateTable { changes, .. } => flat.extend(flatten(changes)),
            other => flat.push(other.clone()),
        }
    }
    flat
}

pub fn position(changes: &[Change], wanted: impl Fn(&Change) -> bool) -> usize {
    changes
        .iter()
        .position(wanted)
        .unwrap_or_else(|| panic!("Change not found in {changes:#?}"))
}

pub fn shop_v1() -> Database {
    Database::new("shop")
        .table(
            Table::new("customers")
                .column(Column::new("id", JdbcType::Integer).primary_key())
                .column(Column::new("name", JdbcType::Varchar).size(80).required())
                .column(Column::new("email", JdbcType::Varchar).size(120))
                .index(Index::new("idx_customer_email").column("email")),
        )
        .table(
            Table::new("orders")
                .column(
                    Column::new("id", JdbcType::Integer)
                        .primary_key()
                        .auto_increment(),
                )
                .column(Column::new("customer_id", JdbcType::Integer).required())
                .column(Column::new("total", JdbcType::Decimal).size(12).scale(2))
                .column(Column::new("note", JdbcType::Varchar).size(200))
                .index(Index::new("idx_orders_customer").column("customer_id"))
                .foreign_key(
                    ForeignKey::new("customers")
                        .name("fk_orders_customer")
                        .reference("customer_id", "id"),
                ),
        )
}

pub fn shop_v2() -> Database {
    Database::new("shop")
        .table(
            Table::new("customers")
                .column(Column::new("id", JdbcType::Integer).primary_key())
                .column(Column::new("name", JdbcType::Varchar).size(120).required())
                .column(Column::new("email", JdbcType::Varchar).size(120))
                .column(Column::new("phone", JdbcType::Varchar).size(30))
                .index(Index::unique("idx_customer_email").column("email")),
        )
        .table(
            Table::new("orders")
                .column(
                    Column::new("id", JdbcType::Integer)
                        .primary_key()
                        .auto_increment(),
                )
                .column(Column::new("customer_id", JdbcType::BigInt).required())
                .column(Column::new("total", JdbcType::Decimal).size(14).scale(2))
                .index(Index::new("idx_orders_customer").column("customer_id"))
                .foreign_key(
                    ForeignKey::new("customers")
                        .name("fk_orders_customer")
                        .reference("customer_id", "id"),
                ),
        )
        .table(
            Table::new("order_lines")
                .column(Column::new("order_id", JdbcType::Integer).primary_key())
                .column(Column::new("line_no", JdbcType::Integer).primary_key())
                .column(
                    Column::new("qty", JdbcType::Integer)
                        .required()
                        .default_value("1"),
                )
                .foreign_key(ForeignKey::new("orders").reference("order_id", "id")),
        )
}
