//! Error types for type mapping, platform setup and schema comparison.

/// Errors raised by the type registry, the type mapper, the platform
/// registry and the model comparator.
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// A mapping references a native type that was never registered.
    #[error("Mapping for {abstract_type} references native type '{native_type}' which is not registered")]
    Configuration {
        /// The abstract type the mapping was declared for.
        abstract_type: String,
        /// The missing native type name.
        native_type: String,
    },

    /// No exact or promotable mapping exists for a column's type.
    #[error("Column '{table}.{column}' of type {type_name} cannot be represented on platform {platform}")]
    UnsupportedColumnType {
        /// Table containing the column.
        table: String,
        /// Column name.
        column: String,
        /// Abstract type requested by the column.
        type_name: String,
        /// Target platform name.
        platform: String,
    },

    /// The resolved native type is too small for the column.
    #[error("Column '{table}.{column}' requests {requested} but native type {native_type} only holds {capacity}")]
    ColumnExceedsTypeCapacity {
        /// Table containing the column.
        table: String,
        /// Column name.
        column: String,
        /// Native type that was selected.
        native_type: String,
        /// Requested size (or scale).
        requested: u64,
        /// Capacity of the native type.
        capacity: u64,
    },

    /// A unique index was asked to become non-unique.
    #[error("Index '{0}' is a unique index and cannot be made non-unique")]
    InvalidIndexState(String),

    /// No platform is registered under this name.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    /// A database-level operation is not available for this platform and driver.
    #[error("Operation '{operation}' is not supported by platform {platform} with driver '{driver}'")]
    UnsupportedOperation {
        /// Platform name.
        platform: String,
        /// The requested operation.
        operation: String,
        /// JDBC driver class name.
        driver: String,
    },

    /// A change was applied to a model that does not match it.
    #[error("Invalid model state: {0}")]
    InvalidState(String),

    /// A size specification could not be parsed.
    #[error("Invalid size specification '{spec}' for column '{column}'")]
    InvalidSize {
        /// Column name.
        column: String,
        /// The offending specification.
        spec: String,
    },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, DdlError>;
