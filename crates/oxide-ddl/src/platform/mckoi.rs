//! McKoi SQL.

use crate::error::Result;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "Mckoi";

const TYPES: &[(&str, u64)] = &[
    ("BOOLEAN", 1),
    ("TINYINT", 3),
    ("SMALLINT", 5),
    ("INTEGER", 10),
    ("BIGINT", 19),
    ("NUMERIC", 0),
    ("REAL", 0),
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
];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR", SIZED),
    (J::LongVarchar, "LONGVARCHAR", PLAIN),
    (J::Clob, "LONGVARCHAR", PLAIN),
    (J::Numeric, "NUMERIC", PRECISION),
    (J::Decimal, "NUMERIC", PRECISION),
    (J::Bit, "BOOLEAN", PLAIN),
    (J::Boolean, "BOOLEAN", PLAIN),
    (J::TinyInt, "TINYINT", PLAIN),
    (J::SmallInt, "SMALLINT", PLAIN),
    (J::Integer, "INTEGER", PLAIN),
    (J::BigInt, "BIGINT", PLAIN),
    (J::Real, "REAL", PLAIN),
    (J::Float, "DOUBLE", PLAIN),
    (J::Double, "DOUBLE", PLAIN),
    (J::Binary, "BINARY", SIZED),
    (J::VarBinary, "VARBINARY", SIZED),
    (J::LongVarBinary, "LONGVARBINARY", PLAIN),
    (J::Blob, "LONGVARBINARY", PLAIN),
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
    info.add_required_column_without_default_supported = true;
    info.database_operation_drivers = vec!["com.mckoi.JDBCDriver".into()];

    Ok(Platform::new(info, types))
}
