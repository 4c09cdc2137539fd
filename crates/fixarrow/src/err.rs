//! Error types for the fixarrow crate.
//!
//! [`EngineError`] is the single error type returned by every fallible public
//! operation: configuration validation, partitioning/reads, and the optional
//! sink writers.

/// The error type returned by the fixarrow engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The row layout has no fields.
    #[error("row layout has no fields")]
    EmptyLayout,

    /// `sub_schema_sizes` does not partition the field list.
    #[error("sub_schema_sizes {sizes:?} sums to {sum} but layout has {field_count} fields")]
    InconsistentSubSchemaSizes {
        /// The configured sub-schema sizes.
        sizes: Vec<usize>,
        /// Their sum.
        sum: usize,
        /// The actual number of fields in the layout.
        field_count: usize,
    },

    /// `column_cap` was zero.
    #[error("column_cap must be greater than zero")]
    ZeroColumnCap,

    /// `cores` was zero.
    #[error("cores must be greater than zero")]
    ZeroCores,

    /// A field name was not unique within its sub-schema.
    #[error("duplicate field name {name:?} within sub-schema {sub_schema_id}")]
    DuplicateFieldName {
        /// The duplicated field name.
        name: String,
        /// The sub-schema it was duplicated within.
        sub_schema_id: usize,
    },

    /// A chunk's byte range contained no recognizable line terminator.
    #[error("no line terminator found in byte range [{start}, {end})")]
    AlignmentError {
        /// Start of the offending byte range.
        start: usize,
        /// End of the offending byte range.
        end: usize,
    },

    /// I/O error while reading the input stream.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Error from the Arrow library.
    #[error("{0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// Error from the Parquet library.
    #[cfg(feature = "parquet")]
    #[error("{0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON serialization/deserialization error (layout/config files).
    #[error("{0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Rayon thread pool build error.
    #[error("{0}")]
    Rayon(#[from] rayon::ThreadPoolBuildError),

    /// Catch-all error with a custom message.
    #[error("{0}")]
    Other(String),
}
