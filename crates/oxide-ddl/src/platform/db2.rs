//! IBM DB2.

use crate::error::Result;
use crate::model::ForeignKeyAction;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{ColumnAlterSupport, Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "Db2";

const TYPES: &[(&str, u64)] = &[
    ("SMALLINT", 5),
    ("INTEGER", 10),
    ("BIGINT", 19),
    ("DECIMAL", 31),
    ("REAL", 0),
    ("DOUBLE", 0),
    ("CHAR", 254),
    ("VARCHAR", 32_672),
    ("LONG VARCHAR", 32_700),
    ("CLOB", 0),
    ("CHAR FOR BIT DATA", 254),
    ("VARCHAR FOR BIT DATA", 32_672),
    ("LONG VARCHAR FOR BIT DATA", 32_700),
    ("BLOB", 0),
    ("DATE", 0),
    ("TIME", 0),
    ("TIMESTAMP", 0),
    ("INTEGER GENERATED BY DEFAULT AS IDENTITY", 10),
    ("BIGINT GENERATED BY DEFAULT AS IDENTITY", 19),
];

const SCALES: &[(&str, u32, u32)] = &[("DECIMAL", 0, 31)];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR", SIZED),
    (J::LongVarchar, "LONG VARCHAR", PLAIN),
    (J::Clob, "CLOB", PLAIN),
    (J::Numeric, "DECIMAL", PRECISION),
    (J::Decimal, "DECIMAL", PRECISION),
    (J::Bit, "SMALLINT", PLAIN),
    (J::Boolean, "SMALLINT", PLAIN),
    (J::TinyInt, "SMALLINT", PLAIN),
    (J::SmallInt, "SMALLINT", PLAIN),
    (J::Integer, "INTEGER", PLAIN),
    (J::BigInt, "BIGINT", PLAIN),
    (J::Real, "REAL", PLAIN),
    (J::Float, "DOUBLE", PLAIN),
    (J::Double, "DOUBLE", PLAIN),
    (J::Binary, "CHAR FOR BIT DATA", SIZED),
    (J::VarBinary, "VARCHAR FOR BIT DATA", SIZED),
    (J::LongVarBinary, "LONG VARCHAR FOR BIT DATA", PLAIN),
    (J::Blob, "BLOB", PLAIN),
    (J::Date, "DATE", PLAIN),
    (J::Time, "TIME", PLAIN),
    (J::Timestamp, "TIMESTAMP", PLAIN),
];

const AUTO_INCREMENT: &[(J, &str, SizeFormat)] = &[
    (J::Integer, "INTEGER GENERATED BY DEFAULT AS IDENTITY", PLAIN),
    (J::BigInt, "BIGINT GENERATED BY DEFAULT AS IDENTITY", PLAIN),
];

pub(super) fn platform() -> Result<Platform> {
    let types = TypeTables {
        types: TYPES,
        scales: SCALES,
        mappings: MAPPINGS,
        auto_increment: AUTO_INCREMENT,
    }
    .build()?;

    let mut info = PlatformInfo::new(NAME);
    info.max_identifier_length = Some(18);
    info.column_alter = ColumnAlterSupport::WideningOnly;
    info.supported_on_update_actions = vec![ForeignKeyAction::NoAction, ForeignKeyAction::Restrict];
    info.supported_on_delete_actions = vec![
        ForeignKeyAction::NoAction,
        ForeignKeyAction::Restrict,
        ForeignKeyAction::Cascade,
        ForeignKeyAction::SetNull,
    ];
    info.database_operation_drivers = vec!["com.ibm.db2.jcc.DB2Driver".into()];
    for t in [J::Char, J::Varchar, J::Binary, J::VarBinary] {
        info.set_default_size(t, 254);
    }

    Ok(Platform::new(info, types))
}
