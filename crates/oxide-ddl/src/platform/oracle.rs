//! Oracle 8 and later.
//!
//! Every exact numeric type is a NUMBER. Auto-increment columns are
//! emulated with sequences, so there are no identity mappings and such
//! columns take their ordinary type.

use crate::error::Result;
use crate::model::ForeignKeyAction;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{ColumnAlterSupport, Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "Oracle";

const TYPES: &[(&str, u64)] = &[
    ("NUMBER", 38),
    ("REAL", 0),
    ("FLOAT", 0),
    ("DOUBLE PRECISION", 0),
    ("CHAR", 2000),
    ("VARCHAR2", 4000),
    ("CLOB", 0),
    ("RAW", 2000),
    ("BLOB", 0),
    ("DATE", 0),
    ("TIMESTAMP", 0),
];

const SCALES: &[(&str, u32, u32)] = &[("NUMBER", 0, 127)];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR2", SIZED),
    (J::LongVarchar, "CLOB", PLAIN),
    (J::Clob, "CLOB", PLAIN),
    (J::Numeric, "NUMBER", PRECISION),
    (J::Decimal, "NUMBER", PRECISION),
    (J::Bit, "NUMBER", PLAIN),
    (J::Boolean, "NUMBER", PLAIN),
    (J::TinyInt, "NUMBER", PRECISION),
    (J::SmallInt, "NUMBER", PRECISION),
    (J::Integer, "NUMBER", PRECISION),
    (J::BigInt, "NUMBER", PRECISION),
    (J::Real, "REAL", PLAIN),
    (J::Float, "FLOAT", PLAIN),
    (J::Double, "DOUBLE PRECISION", PLAIN),
    (J::Binary, "RAW", SIZED),
    (J::VarBinary, "RAW", SIZED),
    (J::LongVarBinary, "BLOB", PLAIN),
    (J::Blob, "BLOB", PLAIN),
    (J::Date, "DATE", PLAIN),
    (J::Time, "DATE", PLAIN),
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
    info.max_identifier_length = Some(30);
    info.column_alter = ColumnAlterSupport::WideningOnly;
    info.supported_on_update_actions = vec![ForeignKeyAction::NoAction];
    info.supported_on_delete_actions = vec![
        ForeignKeyAction::NoAction,
        ForeignKeyAction::Cascade,
        ForeignKeyAction::SetNull,
    ];
    info.set_default_size(J::TinyInt, 3);
    info.set_default_size(J::SmallInt, 5);
    info.set_default_size(J::Integer, 10);
    info.set_default_size(J::BigInt, 19);

    Ok(Platform::new(info, types))
}
