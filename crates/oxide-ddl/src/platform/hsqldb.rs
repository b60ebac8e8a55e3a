//! HSQLDB.
//!
//! Sizes are not enforced, so every type is unbounded. The index that
//! backs the primary key is named `SYS_IDX_` followed by a number and
//! is never a user index.

use crate::error::Result;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{system_index_pattern, Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "HsqlDb";

const TYPES: &[(&str, u64)] = &[
    ("BIT", 0),
    ("BOOLEAN", 0),
    ("TINYINT", 0),
    ("SMALLINT", 0),
    ("INTEGER", 0),
    ("BIGINT", 0),
    ("NUMERIC", 0),
    ("DECIMAL", 0),
    ("REAL", 0),
    ("FLOAT", 0),
    ("DOUBLE", 0),
    ("CHAR", 0),
    ("VARCHAR", 0),
    ("LONGVARCHAR", 0),
    ("BINARY", 0),
    ("VARBINARY", 0),
    ("LONGVARBINARY", 0),
    ("DATE", 0),
    ("TIME", 0),
    ("TIMESTAMP", 0),
    ("INTEGER GENERATED BY DEFAULT AS IDENTITY", 0),
    ("BIGINT GENERATED BY DEFAULT AS IDENTITY", 0),
];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR", SIZED),
    (J::LongVarchar, "LONGVARCHAR", PLAIN),
    (J::Clob, "LONGVARCHAR", PLAIN),
    (J::Numeric, "NUMERIC", PRECISION),
    (J::Decimal, "DECIMAL", PRECISION),
    (J::Bit, "BIT", PLAIN),
    (J::Boolean, "BOOLEAN", PLAIN),
    (J::TinyInt, "TINYINT", PLAIN),
    (J::SmallInt, "SMALLINT", PLAIN),
    (J::Integer, "INTEGER", PLAIN),
    (J::BigInt, "BIGINT", PLAIN),
    (J::Real, "REAL", PLAIN),
    (J::Float, "FLOAT", PLAIN),
    (J::Double, "DOUBLE", PLAIN),
    (J::Binary, "BINARY", SIZED),
    (J::VarBinary, "VARBINARY", SIZED),
    (J::LongVarBinary, "LONGVARBINARY", PLAIN),
    (J::Blob, "LONGVARBINARY", PLAIN),
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
        scales: &[],
        mappings: MAPPINGS,
        auto_increment: AUTO_INCREMENT,
    }
    .build()?;

    let mut info = PlatformInfo::new(NAME);
    info.mixing_identity_and_normal_pk_allowed = false;
    info.positional_add_column_supported = true;
    info.system_index_pattern = system_index_pattern("^SYS_IDX_");
    info.database_operation_drivers = vec!["org.hsqldb.jdbcDriver".into()];

    Ok(Platform::new(info, types))
}
