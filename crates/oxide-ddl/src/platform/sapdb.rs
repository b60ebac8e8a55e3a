//! SapDB, also registered as MaxDB.

use crate::error::Result;
use crate::model::ForeignKeyAction;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "SapDB";

const TYPES: &[(&str, u64)] = &[
    ("BOOLEAN", 1),
    ("SMALLINT", 5),
    ("INTEGER", 10),
    ("FIXED", 38),
    ("FLOAT", 38),
    ("DOUBLE PRECISION", 0),
    ("CHAR", 8000),
    ("VARCHAR", 8000),
    ("LONG", 0),
    ("CHAR BYTE", 8000),
    ("VARCHAR BYTE", 8000),
    ("LONG BYTE", 0),
    ("DATE", 0),
    ("TIME", 0),
    ("TIMESTAMP", 0),
];

const SCALES: &[(&str, u32, u32)] = &[("FIXED", 0, 38)];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR", SIZED),
    (J::LongVarchar, "LONG", PLAIN),
    (J::Clob, "LONG", PLAIN),
    (J::Numeric, "FIXED", PRECISION),
    (J::Decimal, "FIXED", PRECISION),
    (J::Bit, "BOOLEAN", PLAIN),
    (J::Boolean, "BOOLEAN", PLAIN),
    (J::TinyInt, "SMALLINT", PLAIN),
    (J::SmallInt, "SMALLINT", PLAIN),
    (J::Integer, "INTEGER", PLAIN),
    (J::BigInt, "FIXED", PRECISION),
    (J::Real, "FLOAT", PLAIN),
    (J::Float, "DOUBLE PRECISION", PLAIN),
    (J::Double, "DOUBLE PRECISION", PLAIN),
    (J::Binary, "CHAR BYTE", SIZED),
    (J::VarBinary, "VARCHAR BYTE", SIZED),
    (J::LongVarBinary, "LONG BYTE", PLAIN),
    (J::Blob, "LONG BYTE", PLAIN),
    (J::Date, "DATE", PLAIN),
    (J::Time, "TIME", PLAIN),
    (J::Timestamp, "TIMESTAMP", PLAIN),
];

pub(super) fn platform() -> Result<Platform> {
    let types = TypeTables {
        types: TYPES,
        scales: SCALES,
        mappings: MAPPINGS,
        auto_increment: &[],
    }
    .build()?;

    let mut info = PlatformInfo::new(NAME);
    info.max_identifier_length = Some(32);
    info.supported_on_update_actions = vec![ForeignKeyAction::NoAction, ForeignKeyAction::Restrict];
    // Key columns cannot be dropped, even while the key is redefined.
    info.primary_key_column_drop_supported = false;
    info.set_default_size(J::BigInt, 38);
    for t in [J::Char, J::Varchar, J::Binary, J::VarBinary] {
        info.set_default_size(t, 254);
    }

    Ok(Platform::new(info, types))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::Change;
    use crate::model::{Column, Database, Table};

    #[test]
    fn test_dropping_key_column_rebuilds() {
        let p = platform().unwrap();
        let source = Database::new("d").table(
            Table::new("lines")
                .column(Column::new("order_id", J::Integer).primary_key())
                .column(Column::new("line_no", J::Integer).primary_key())
                .column(Column::new("qty", J::Integer)),
        );
        let mut target = source.clone();
        target.tables[0].columns.remove(1);

        let changes = p.model_comparator(false).compare(&source, &target).unwrap();
        assert!(matches!(&changes[..], [Change::RecreateTable { .. }]));

        let mut target = source.clone();
        target.tables[0].columns.remove(2);
        let changes = p.model_comparator(false).compare(&source, &target).unwrap();
        assert!(matches!(&changes[..], [Change::RemoveColumn { .. }]));
    }
}
