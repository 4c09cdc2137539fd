//! Concrete [`TableSink`] implementations: Parquet and Feather (Arrow IPC).
//!
//! Each sub-schema is written to its own file when a layout has more than
//! one sub-schema, named `<base>.<sub_schema_id>.<ext>`; with a single
//! sub-schema the base path is used as-is.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::RecordBatch;
use arrow_schema::Schema;

use crate::err::EngineError;
use crate::table::TableSink;

fn path_for_sub_schema(base: &Path, sub_schema_id: usize, sub_schema_count: usize, ext: &str) -> PathBuf {
    if sub_schema_count <= 1 {
        return base.to_path_buf();
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let dir = base.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{stem}.{sub_schema_id}.{ext}"))
}

/// Writes each sub-schema to its own Apache Parquet file.
#[cfg(feature = "parquet")]
pub struct ParquetSink {
    base_path: PathBuf,
    sub_schema_count: usize,
    compression: parquet::basic::Compression,
}

#[cfg(feature = "parquet")]
impl ParquetSink {
    /// Create a sink rooted at `base_path`, writing `sub_schema_count`
    /// sub-schemas with the given Parquet compression codec.
    pub fn new(base_path: impl Into<PathBuf>, sub_schema_count: usize) -> Self {
        ParquetSink {
            base_path: base_path.into(),
            sub_schema_count,
            compression: parquet::basic::Compression::SNAPPY,
        }
    }

    /// Override the compression codec (defaults to Snappy).
    pub fn with_compression(mut self, compression: parquet::basic::Compression) -> Self {
        self.compression = compression;
        self
    }
}

#[cfg(feature = "parquet")]
impl TableSink for ParquetSink {
    fn write_sub_schema(
        &mut self,
        sub_schema_id: usize,
        schema: &Arc<Schema>,
        batches: &[RecordBatch],
    ) -> Result<(), EngineError> {
        use parquet::arrow::ArrowWriter;
        use parquet::file::properties::WriterProperties;

        let path = path_for_sub_schema(&self.base_path, sub_schema_id, self.sub_schema_count, "parquet");
        let file = File::create(&path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .build();
        let mut writer = ArrowWriter::try_new(BufWriter::new(file), schema.clone(), Some(props))?;
        for batch in batches {
            writer.write(batch)?;
        }
        writer.close()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Writes each sub-schema to its own Feather (Arrow IPC) file.
#[cfg(feature = "feather")]
pub struct FeatherSink {
    base_path: PathBuf,
    sub_schema_count: usize,
}

#[cfg(feature = "feather")]
impl FeatherSink {
    /// Create a sink rooted at `base_path`, writing `sub_schema_count` sub-schemas.
    pub fn new(base_path: impl Into<PathBuf>, sub_schema_count: usize) -> Self {
        FeatherSink {
            base_path: base_path.into(),
            sub_schema_count,
        }
    }
}

#[cfg(feature = "feather")]
impl TableSink for FeatherSink {
    fn write_sub_schema(
        &mut self,
        sub_schema_id: usize,
        schema: &Arc<Schema>,
        batches: &[RecordBatch],
    ) -> Result<(), EngineError> {
        use arrow_ipc::writer::FileWriter;

        let path = path_for_sub_schema(&self.base_path, sub_schema_id, self.sub_schema_count, "feather");
        let file = File::create(&path)?;
        let mut writer = FileWriter::try_new(BufWriter::new(file), schema)?;
        for batch in batches {
            writer.write(batch)?;
        }
        writer.finish()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}
