//! Sybase ASE.
//!
//! Only NUMERIC columns can be identities, so other auto-increment
//! columns are promoted to NUMERIC.

use crate::error::Result;
use crate::registry::SizeFormat;
use crate::types::JdbcType as J;

use super::{Platform, PlatformInfo, TypeTables, PLAIN, PRECISION, SIZED};

const NAME: &str = "Sybase";

const TYPES: &[(&str, u64)] = &[
    ("BIT", 1),
    ("TINYINT", 3),
    ("SMALLINT", 5),
    ("INT", 10),
    ("BIGINT", 19),
    ("NUMERIC", 38),
    ("DECIMAL", 38),
    ("REAL", 0),
    ("DOUBLE PRECISION", 0),
    ("CHAR", 16_384),
    ("VARCHAR", 16_384),
    ("TEXT", 0),
    ("BINARY", 16_384),
    ("VARBINARY", 16_384),
    ("IMAGE", 0),
    ("DATETIME", 0),
    ("NUMERIC IDENTITY", 38),
];

const SCALES: &[(&str, u32, u32)] = &[
    ("NUMERIC", 0, 38),
    ("DECIMAL", 0, 38),
    ("NUMERIC IDENTITY", 0, 0),
];

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
    (J::Float, "DOUBLE PRECISION", PLAIN),
    (J::Double, "DOUBLE PRECISION", PLAIN),
    (J::Binary, "BINARY", SIZED),
    (J::VarBinary, "VARBINARY", SIZED),
    (J::LongVarBinary, "IMAGE", PLAIN),
    (J::Blob, "IMAGE", PLAIN),
    (J::Date, "DATETIME", PLAIN),
    (J::Time, "DATETIME", PLAIN),
    (J::Timestamp, "DATETIME", PLAIN),
];

const AUTO_INCREMENT: &[(J, &str, SizeFormat)] = &[(J::Numeric, "NUMERIC IDENTITY", PRECISION)];

pub(super) fn platform() -> Result<Platform> {
    let types = TypeTables {
        types: TYPES,
        scales: SCALES,
        mappings: MAPPINGS,
        auto_increment: AUTO_INCREMENT,
    }
    .build()?;

    let mut info = PlatformInfo::new(NAME);
    info.max_identifier_length = Some(28);
    info.null_as_default_value_required = true;
    info.add_auto_increment_column_supported = false;
    info.auto_increment_change_supported = false;
    info.mixing_identity_and_normal_pk_allowed = false;
    info.database_operation_drivers = vec!["com.sybase.jdbc2.jdbc.SybDriver".into()];
    for t in [J::Char, J::Varchar, J::Binary, J::VarBinary] {
        info.set_default_size(t, 254);
    }

    Ok(Platform::new(info, types))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    #[test]
    fn test_identity_columns_become_numeric() {
        let p = platform().unwrap();
        let mapper = p.type_mapper();

        let id = mapper
            .map_column("t", &Column::new("id", J::Integer).primary_key().auto_increment())
            .unwrap();
        assert_eq!(id.jdbc_type, J::Numeric);
        assert_eq!(id.native_type.as_deref(), Some("NUMERIC IDENTITY"));

        let n = mapper.map_column("t", &Column::new("n", J::Integer)).unwrap();
        assert_eq!(n.jdbc_type, J::Integer);
        assert_eq!(n.native_type.as_deref(), Some("INT"));
    }
}
