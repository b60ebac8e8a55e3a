//! Firebird, also registered as Interbase.

use crate::error::Result;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "Firebird";

const TYPES: &[(&str, u64)] = &[
    ("SMALLINT", 5),
    ("INTEGER", 10),
    ("BIGINT", 19),
    ("DECIMAL", 18),
    ("NUMERIC", 18),
    ("FLOAT", 0),
    ("DOUBLE PRECISION", 0),
    ("CHAR", 32_767),
    ("VARCHAR", 32_765),
    ("BLOB SUB_TYPE TEXT", 0),
    ("BLOB", 0),
    ("DATE", 0),
    ("TIME", 0),
    ("TIMESTAMP", 0),
];

const SCALES: &[(&str, u32, u32)] = &[("DECIMAL", 0, 18), ("NUMERIC", 0, 18)];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR", SIZED),
    (J::LongVarchar, "BLOB SUB_TYPE TEXT", PLAIN),
    (J::Clob, "BLOB SUB_TYPE TEXT", PLAIN),
    (J::Numeric, "NUMERIC", PRECISION),
    (J::Decimal, "DECIMAL", PRECISION),
    (J::Bit, "SMALLINT", PLAIN),
    (J::Boolean, "SMALLINT", PLAIN),
    (J::TinyInt, "SMALLINT", PLAIN),
    (J::SmallInt, "SMALLINT", PLAIN),
    (J::Integer, "INTEGER", PLAIN),
    (J::BigInt, "BIGINT", PLAIN),
    (J::Real, "FLOAT", PLAIN),
    (J::Float, "DOUBLE PRECISION", PLAIN),
    (J::Double, "DOUBLE PRECISION", PLAIN),
    (J::Binary, "BLOB", PLAIN),
    (J::VarBinary, "BLOB", PLAIN),
    (J::LongVarBinary, "BLOB", PLAIN),
    (J::Blob, "BLOB", PLAIN),
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
    info.max_identifier_length = Some(31);
    info.positional_add_column_supported = true;
    info.column_reorder_supported = true;
    info.database_operation_drivers = vec!["org.firebirdsql.jdbc.FBDriver".into()];
    for t in [J::Binary, J::VarBinary] {
        info.set_has_size(t, false);
    }
    for t in [J::Char, J::Varchar] {
        info.set_default_size(t, 254);
    }

    Ok(Platform::new(info, types))
}
