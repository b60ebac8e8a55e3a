//! Vendor-neutral schema model, type mapping and schema diff.
//!
//! `oxide-ddl` describes a relational schema once, in terms of abstract
//! JDBC types, and adapts it to concrete database platforms:
//!
//! - **Model** - Tables, columns, indexes and foreign keys
//! - **Registry** - Native types of a platform and how abstract types map onto them
//! - **Mapper** - Picks a native type for every column, widening within a
//!   type family when the requested size does not fit
//! - **Comparator** - Computes the ordered changes that turn one model into another
//! - **Platform** - Capabilities, native types and the policy deciding when a
//!   table must be rebuilt instead of altered
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_ddl::prelude::*;
//!
//! let platforms = PlatformRegistry::with_builtin_platforms()?;
//! let mysql = platforms.get("mysql")?;
//!
//! let model = Database::new("shop").table(
//!     Table::new("articles")
//!         .column(Column::new("id", JdbcType::Integer).primary_key().auto_increment())
//!         .column(Column::new("body", JdbcType::Varchar).size(70_000)),
//! );
//!
//! // body becomes a LONGVARCHAR stored as MEDIUMTEXT
//! let mapped = mysql.type_mapper().map_database(&model)?;
//!
//! for change in mysql.model_comparator(false).compare(&model, &mapped)? {
//!     println!("{change}");
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # List the built-in platforms
//! oxide-ddl platforms
//!
//! # Map a model onto a platform
//! oxide-ddl map --platform PostgreSql model.json
//!
//! # Changes turning one model into another
//! oxide-ddl diff --platform MySQL current.json wanted.json
//! ```

pub mod changes;
pub mod comparator;
pub mod error;
pub mod mapper;
pub mod model;
pub mod platform;
pub mod registry;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::changes::Change;
    pub use crate::comparator::ModelComparator;
    pub use crate::error::{DdlError, Result};
    pub use crate::mapper::TypeMapper;
    pub use crate::model::{
        Column, Database, DefaultValue, ForeignKey, ForeignKeyAction, Index, Reference, Table,
    };
    pub use crate::platform::{
        ColumnAlterSupport, DefaultTableDefinitionChangesPredicate, Platform, PlatformInfo,
        PlatformRegistry, TableDefinitionChangesPredicate,
    };
    pub use crate::registry::{Mapping, NativeType, SizeFormat, TypeMapping, TypeRegistry};
    pub use crate::types::{JdbcType, TypeFamily};
}
