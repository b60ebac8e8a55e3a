//! PostgreSQL.

use crate::error::Result;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "PostgreSql";

const TYPES: &[(&str, u64)] = &[
    ("BOOLEAN", 1),
    ("SMALLINT", 5),
    ("INTEGER", 10),
    ("BIGINT", 19),
    ("NUMERIC", 1000),
    ("REAL", 0),
    ("DOUBLE PRECISION", 0),
    ("CHAR", 10_485_760),
    ("VARCHAR", 10_485_760),
    ("TEXT", 0),
    ("BYTEA", 0),
    ("DATE", 0),
    ("TIME", 0),
    ("TIMESTAMP", 0),
    ("SMALLSERIAL", 5),
    ("SERIAL", 10),
    ("BIGSERIAL", 19),
];

const SCALES: &[(&str, u32, u32)] = &[("NUMERIC", 0, 1000)];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR", SIZED),
    (J::LongVarchar, "TEXT", PLAIN),
    (J::Clob, "TEXT", PLAIN),
    (J::Numeric, "NUMERIC", PRECISION),
    (J::Decimal, "NUMERIC", PRECISION),
    (J::Bit, "BOOLEAN", PLAIN),
    (J::Boolean, "BOOLEAN", PLAIN),
    (J::TinyInt, "SMALLINT", PLAIN),
    (J::SmallInt, "SMALLINT", PLAIN),
    (J::Integer, "INTEGER", PLAIN),
    (J::BigInt, "BIGINT", PLAIN),
    (J::Real, "REAL", PLAIN),
    (J::Float, "DOUBLE PRECISION", PLAIN),
    (J::Double, "DOUBLE PRECISION", PLAIN),
    (J::Binary, "BYTEA", PLAIN),
    (J::VarBinary, "BYTEA", PLAIN),
    (J::LongVarBinary, "BYTEA", PLAIN),
    (J::Blob, "BYTEA", PLAIN),
    (J::Date, "DATE", PLAIN),
    (J::Time, "TIME", PLAIN),
    (J::Timestamp, "TIMESTAMP", PLAIN),
];

const AUTO_INCREMENT: &[(J, &str, SizeFormat)] = &[
    (J::TinyInt, "SMALLSERIAL", PLAIN),
    (J::SmallInt, "SMALLSERIAL", PLAIN),
    (J::Integer, "SERIAL", PLAIN),
    (J::BigInt, "BIGSERIAL", PLAIN),
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
    info.max_identifier_length = Some(63);
    info.add_auto_increment_column_supported = true;
    info.auto_increment_change_supported = true;
    info.database_operation_drivers = vec!["org.postgresql.Driver".into()];
    for t in [J::Binary, J::VarBinary] {
        info.set_has_size(t, false);
    }
    for t in [J::Char, J::Varchar] {
        info.set_default_size(t, 254);
    }

    Ok(Platform::new(info, types))
}
