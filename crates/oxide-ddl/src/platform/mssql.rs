//! Microsoft SQL Server.
//!
//! Identity is fixed when a column is created: switching it on or off
//! means rebuilding the table.

use crate::error::Result;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "MSSql";

const TYPES: &[(&str, u64)] = &[
    ("BIT", 1),
    ("TINYINT", 3),
    ("SMALLINT", 5),
    ("INT", 10),
    ("BIGINT", 19),
    ("DECIMAL", 38),
    ("NUMERIC", 38),
    ("REAL", 0),
    ("FLOAT", 0),
    ("CHAR", 8000),
    ("VARCHAR", 8000),
    ("TEXT", 0),
    ("BINARY", 8000),
    ("VARBINARY", 8000),
    ("IMAGE", 0),
    ("DATETIME", 0),
    ("TINYINT IDENTITY", 3),
    ("SMALLINT IDENTITY", 5),
    ("INT IDENTITY", 10),
    ("BIGINT IDENTITY", 19),
    ("NUMERIC IDENTITY", 38),
];

const SCALES: &[(&str, u32, u32)] = &[("DECIMAL", 0, 38), ("NUMERIC", 0, 38)];

const MAPPINGS: &[(J, &str, SizeFormat)] = &[
    (J::Char, "CHAR", SIZED),
    (J::Varchar, "VARCHAR", SIZED),
    (J::LongVarchar, "TEXT", PLAIN),
    (J::Clob, "TEXT", PLAIN),
    (J::Numeric, "NUMERIC", PRECISION),
    (J::Decimal, "DECIMAL", PRECISION),
    (J::Bit, "BIT", PLAIN),
    (J::Boolean, "BIT", PLAIN),
    (J::TinyInt, "TINYINT", PLAIN),
    (J::SmallInt, "SMALLINT", PLAIN),
    (J::Integer, "INT", PLAIN),
    (J::BigInt, "BIGINT", PLAIN),
    (J::Real, "REAL", PLAIN),
    (J::Float, "FLOAT", PLAIN),
    (J::Double, "FLOAT", PLAIN),
    (J::Binary, "BINARY", SIZED),
    (J::VarBinary, "VARBINARY", SIZED),
    (J::LongVarBinary, "IMAGE", PLAIN),
    (J::Blob, "IMAGE", PLAIN),
    (J::Date, "DATETIME", PLAIN),
    (J::Time, "DATETIME", PLAIN),
    (J::Timestamp, "DATETIME", PLAIN),
];

const AUTO_INCREMENT: &[(J, &str, SizeFormat)] = &[
    (J::TinyInt, "TINYINT IDENTITY", PLAIN),
    (J::SmallInt, "SMALLINT IDENTITY", PLAIN),
    (J::Integer, "INT IDENTITY", PLAIN),
    (J::BigInt, "BIGINT IDENTITY", PLAIN),
    (J::Numeric, "NUMERIC IDENTITY", PRECISION),
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
    info.max_identifier_length = Some(128);
    info.auto_increment_change_supported = false;
    info.add_auto_increment_column_supported = true;
    info.add_required_column_without_default_supported = false;
    info.database_operation_drivers = vec![
        "com.microsoft.sqlserver.jdbc.SQLServerDriver".into(),
        "net.sourceforge.jtds.jdbc.Driver".into(),
    ];
    for t in [J::Char, J::Varchar, J::Binary, J::VarBinary] {
        info.set_default_size(t, 254);
    }

    Ok(Platform::new(info, types))
}
