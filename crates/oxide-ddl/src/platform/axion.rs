//! Axion.
//!
//! Columns cannot be altered in place at all; any definition change
//! rebuilds the table.

use crate::error::Result;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{ColumnAlterSupport, Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "Axion";

const TYPES: &[(&str, u64)] = &[
    ("BOOLEAN", 1),
    ("BYTE", 3),
    ("SHORT", 5),
    ("INTEGER", 10),
    ("LONG", 19),
    ("NUMBER", 0),
    ("FLOAT", 0),
    ("DOUBLE", 0),
    ("CHAR", 0),
    ("VARCHAR", 0),
    ("CLOB", 0),
    ("BINARY", 0),
    ("VARBINARY", 0),
    ("BLOB", 0),
    ("DATE", 0),
    ("TIME", 0),
    ("TIMESTAMP", 0),
];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR", SIZED),
    (J::LongVarchar, "CLOB", PLAIN),
    (J::Clob, "CLOB", PLAIN),
    (J::Numeric, "NUMBER", PRECISION),
    (J::Decimal, "NUMBER", PRECISION),
    (J::Bit, "BOOLEAN", PLAIN),
    (J::Boolean, "BOOLEAN", PLAIN),
    (J::TinyInt, "BYTE", PLAIN),
    (J::SmallInt, "SHORT", PLAIN),
    (J::Integer, "INTEGER", PLAIN),
    (J::BigInt, "LONG", PLAIN),
    (J::Real, "FLOAT", PLAIN),
    (J::Float, "FLOAT", PLAIN),
    (J::Double, "DOUBLE", PLAIN),
    (J::Binary, "BINARY", SIZED),
    (J::VarBinary, "VARBINARY", SIZED),
    (J::LongVarBinary, "BLOB", PLAIN),
    (J::Blob, "BLOB", PLAIN),
    (J::Date, "DATE", PLAIN),
    (J::Time, "TIME", PLAIN),
    (J::Timestamp, "TIMESTAMP", PLAIN),
];

pub(super) fn platform() -> Result<Platform> {
    let types = TypeTables {
        types: TYPES,
        scales: &[],
        mappings: MAPPINGS,
        auto_increment: &[],
    }
    .build()?;

    let mut info = PlatformInfo::new(NAME);
    info.column_alter = ColumnAlterSupport::None;
    info.database_operation_drivers = vec!["org.axiondb.jdbc.AxionDriver".into()];

    Ok(Platform::new(info, types))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::Change;
    use crate::model::{Column, Database, Table};

    #[test]
    fn test_any_column_change_rebuilds() {
        let p = platform().unwrap();
        let source = Database::new("d").table(
            Table::new("t")
                .column(Column::new("id", J::Integer).primary_key())
                .column(Column::new("note", J::Varchar).size(20)),
        );
        let mut target = source.clone();
        target.tables[0].columns[1].size = Some(200);
        target.tables[0].columns.push(Column::new("extra", J::Integer));

        let changes = p.model_comparator(false).compare(&source, &target).unwrap();
        let [Change::RecreateTable { changes: inner, target_table, .. }] = &changes[..] else {
            panic!("expected a rebuild: {changes:#?}");
        };
        assert_eq!(inner.len(), 2);
        assert_eq!(target_table.columns.len(), 3);
    }
}
