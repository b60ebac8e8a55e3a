//! MySQL.

use crate::error::Result;
use crate::model::ForeignKeyAction;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "MySQL";

const TYPES: &[(&str, u64)] = &[
    ("BIT", 1),
    ("TINYINT", 3),
    ("SMALLINT", 5),
    ("INT", 10),
    ("BIGINT", 19),
    ("DECIMAL", 65),
    ("FLOAT", 0),
    ("DOUBLE", 0),
    ("CHAR", 255),
    ("VARCHAR", 65_535),
    ("MEDIUMTEXT", 16_777_215),
    ("LONGTEXT", 0),
    ("BINARY", 255),
    ("VARBINARY", 65_535),
    ("MEDIUMBLOB", 16_777_215),
    ("LONGBLOB", 0),
    ("DATE", 0),
    ("TIME", 0),
    ("DATETIME", 0),
];

const SCALES: &[(&str, u32, u32)] = &[("DECIMAL", 0, 30)];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR", SIZED),
    (J::LongVarchar, "MEDIUMTEXT", PLAIN),
    (J::Clob, "LONGTEXT", PLAIN),
    (J::Numeric, "DECIMAL", PRECISION),
    (J::Decimal, "DECIMAL", PRECISION),
    (J::Bit, "BIT", PLAIN),
    (J::Boolean, "BIT", PLAIN),
    (J::TinyInt, "TINYINT", PLAIN),
    (J::SmallInt, "SMALLINT", PLAIN),
    (J::Integer, "INT", PLAIN),
    (J::BigInt, "BIGINT", PLAIN),
    (J::Real, "FLOAT", PLAIN),
    (J::Float, "DOUBLE", PLAIN),
    (J::Double, "DOUBLE", PLAIN),
    (J::Binary, "BINARY", SIZED),
    (J::VarBinary, "VARBINARY", SIZED),
    (J::LongVarBinary, "MEDIUMBLOB", PLAIN),
    (J::Blob, "LONGBLOB", PLAIN),
    (J::Date, "DATE", PLAIN),
    (J::Time, "TIME", PLAIN),
    (J::Timestamp, "DATETIME", PLAIN),
];

const AUTO_INCREMENT: &[(J, &str, SizeFormat)] = &[
    (J::TinyInt, "TINYINT", PLAIN),
    (J::SmallInt, "SMALLINT", PLAIN),
    (J::Integer, "INT", PLAIN),
    (J::BigInt, "BIGINT", PLAIN),
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
    info.max_identifier_length = Some(64);
    info.delimited_identifiers_case_sensitive = false;
    info.supported_on_update_actions = vec![
        ForeignKeyAction::NoAction,
        ForeignKeyAction::Restrict,
        ForeignKeyAction::Cascade,
        ForeignKeyAction::SetNull,
    ];
    info.supported_on_delete_actions = info.supported_on_update_actions.clone();
    info.auto_increment_change_supported = true;
    info.positional_add_column_supported = true;
    info.add_auto_increment_column_supported = true;
    info.column_reorder_supported = true;
    // Dropping the index behind a foreign key fails, so the key goes
    // first and comes back afterwards.
    info.recreate_foreign_keys_on_index_drop = true;
    info.database_operation_drivers = vec!["com.mysql.jdbc.Driver".into()];
    for t in [J::Char, J::Varchar, J::Binary, J::VarBinary] {
        info.set_default_size(t, 254);
    }

    Ok(Platform::new(info, types))
}
