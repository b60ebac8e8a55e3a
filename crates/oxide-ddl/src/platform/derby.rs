//! Apache Derby and its predecessor Cloudscape.
//!
//! Both name the indexes backing constraints `SQL` followed by digits.

use crate::error::Result;
use crate::registry::{SizeFormat, TypeRegistry};
use crate::types::JdbcType as J;

use super::{
    system_index_pattern, ColumnAlterSupport, Platform, PlatformInfo, TypeTables, PLAIN,
    PRECISION, SIZED,
};

const NAME: &str = "Derby";
const CLOUDSCAPE: &str = "Cloudscape";

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

fn base_info(name: &str) -> PlatformInfo {
    let mut info = PlatformInfo::new(name);
    info.max_identifier_length = Some(128);
    info.column_alter = ColumnAlterSupport::WideningOnly;
    info.system_index_pattern = system_index_pattern(r"^SQL\d+$");
    for t in [J::Char, J::Varchar, J::Binary, J::VarBinary] {
        info.set_default_size(t, 254);
    }
    info
}

fn types() -> Result<TypeRegistry> {
    TypeTables {
        types: TYPES,
        scales: SCALES,
        mappings: MAPPINGS,
        auto_increment: AUTO_INCREMENT,
    }
    .build()
}

pub(super) fn platform() -> Result<Platform> {
    let mut info = base_info(NAME);
    info.database_operation_drivers = vec![
        "org.apache.derby.jdbc.EmbeddedDriver".into(),
        "org.apache.derby.jdbc.ClientDriver".into(),
    ];
    Ok(Platform::new(info, types()?))
}

pub(super) fn cloudscape() -> Result<Platform> {
    Ok(Platform::new(base_info(CLOUDSCAPE), types()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_indexes_are_system_indexes() {
        for p in [platform().unwrap(), cloudscape().unwrap()] {
            assert!(p.info().is_system_index_name("SQL080222091212240"));
            assert!(!p.info().is_system_index_name("SQL_IDX_NAME"));
        }
        assert!(cloudscape()
            .unwrap()
            .ensure_database_operation("create", "org.apache.derby.jdbc.EmbeddedDriver")
            .is_err());
    }
}
