//! Run configuration: worker count, column capacity, encoding, header/footer
//! flags, and the optional whole-stream hash.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::err::EngineError;
use crate::line::SourceEncoding;
use crate::schema::{FieldType, RowLayout};

/// Below this input size, `cores` is forced to 1: parallel bookkeeping would
/// dominate the parse.
pub const SMALL_INPUT_THRESHOLD_BYTES: u64 = 20 * 1024;

/// Run configuration for a single conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Target worker count; lowered to 1 when the input is below
    /// [`SMALL_INPUT_THRESHOLD_BYTES`].
    pub cores: usize,
    /// Preallocated capacity, in rows, for each column buffer.
    pub column_cap: usize,
    /// Source byte encoding (also selects the line-terminator mode).
    pub source_encoding: SourceEncoding,
    /// Whether the first line of the input is a header to divert, not data.
    pub has_header: bool,
    /// Whether the last line of the input is a footer to divert, not data.
    pub has_footer: bool,
    /// Whether to compute a SHA-256 digest over the raw input bytes, in
    /// ingest order.
    pub calc_hash: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cores: 1,
            column_cap: 1024,
            source_encoding: SourceEncoding::Utf8,
            has_header: false,
            has_footer: false,
            calc_hash: false,
        }
    }
}

impl EngineConfig {
    /// Start from defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target worker count.
    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }

    /// Set the per-column preallocated row capacity.
    pub fn with_column_cap(mut self, column_cap: usize) -> Self {
        self.column_cap = column_cap;
        self
    }

    /// Set the source encoding.
    pub fn with_source_encoding(mut self, source_encoding: SourceEncoding) -> Self {
        self.source_encoding = source_encoding;
        self
    }

    /// Set whether a header row is present.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set whether a footer row is present.
    pub fn with_footer(mut self, has_footer: bool) -> Self {
        self.has_footer = has_footer;
        self
    }

    /// Set whether to compute the whole-stream SHA-256 digest.
    pub fn with_calc_hash(mut self, calc_hash: bool) -> Self {
        self.calc_hash = calc_hash;
        self
    }

    /// Resolve the effective worker count for an input of `input_size` bytes:
    /// the configured `cores`, forced down to 1 below the small-input
    /// threshold.
    pub fn resolve_cores(&self, input_size: u64) -> usize {
        if input_size < SMALL_INPUT_THRESHOLD_BYTES {
            1
        } else {
            self.cores.max(1)
        }
    }

    /// Validate configuration fields that don't depend on the layout.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.cores == 0 {
            return Err(EngineError::ZeroCores);
        }
        if self.column_cap == 0 {
            return Err(EngineError::ZeroColumnCap);
        }
        Ok(())
    }

    /// Load a layout from a JSON file. Layouts are plain
    /// `{"fields": [...], "sub_schema_sizes": [...]}` documents, matching
    /// `RowLayout`'s `Serialize`/`Deserialize` derive.
    pub fn load_layout(path: impl AsRef<Path>) -> Result<RowLayout, EngineError> {
        let text = std::fs::read_to_string(path)?;
        let layout: RowLayout = serde_json::from_str(&text)?;
        layout.validate()?;
        Ok(layout)
    }
}

/// Extension hook: a map from [`FieldType`] to a codec-factory override,
/// merged over the built-in registry in `codec.rs`. Semantically a builder
/// on top of [`EngineConfig`]; there is no runtime monkey-patching, only a
/// lookup table consulted at layout-binding time.
#[derive(Default)]
pub struct CustomColumnBuilders {
    factories: HashMap<FieldType, fn(usize) -> crate::codec::Codec>,
}

impl CustomColumnBuilders {
    /// An empty override map (falls back to the built-in registry for every type).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom factory for `field_type`, overriding the built-in one.
    pub fn register(mut self, field_type: FieldType, factory: fn(usize) -> crate::codec::Codec) -> Self {
        self.factories.insert(field_type, factory);
        self
    }

    /// Resolve a codec for `field_type`, preferring a registered override,
    /// falling back to [`Codec::new`](crate::codec::Codec::new).
    pub fn build(&self, field_type: FieldType, capacity: usize) -> crate::codec::Codec {
        match self.factories.get(&field_type) {
            Some(factory) => factory(capacity),
            None => crate::codec::Codec::new(field_type, capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_input_forces_one_core() {
        let cfg = EngineConfig::new().with_cores(8);
        assert_eq!(cfg.resolve_cores(100), 1);
        assert_eq!(cfg.resolve_cores(SMALL_INPUT_THRESHOLD_BYTES), 8);
    }

    #[test]
    fn zero_cores_rejected() {
        let cfg = EngineConfig::new().with_cores(0);
        assert!(matches!(cfg.validate(), Err(EngineError::ZeroCores)));
    }

    #[test]
    fn zero_column_cap_rejected() {
        let cfg = EngineConfig::new().with_column_cap(0);
        assert!(matches!(cfg.validate(), Err(EngineError::ZeroColumnCap)));
    }

    #[test]
    fn default_registry_used_when_no_override() {
        let registry = CustomColumnBuilders::new();
        let codec = registry.build(FieldType::Int32, 4);
        assert!(matches!(codec, crate::codec::Codec::Int32(_)));
    }
}
