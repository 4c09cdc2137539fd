//! Table assembly and the sink interface handed to the external columnar
//! writer.

use std::sync::Arc;

use arrow_array::RecordBatch;
use arrow_schema::Schema;

use crate::err::EngineError;

/// The ordered, per-sub-schema batch sequences produced by a run.
///
/// `batches[i][c]` is the record batch chunk `c` produced for sub-schema
/// `i`; batches within a sub-schema are concatenation-equivalent to the
/// input row order because chunk index monotonically tracks file offset.
pub struct Table {
    schemas: Vec<Arc<Schema>>,
    batches: Vec<Vec<RecordBatch>>,
}

impl Table {
    /// Start an empty table with one batch sequence per sub-schema schema.
    pub fn new(schemas: Vec<Arc<Schema>>) -> Self {
        let batches = schemas.iter().map(|_| Vec::new()).collect();
        Table { schemas, batches }
    }

    /// Append one chunk's worth of batches (one per sub-schema, in
    /// sub-schema order) to the end of each sub-schema's sequence.
    pub fn append_chunk(&mut self, chunk_batches: Vec<RecordBatch>) -> Result<(), EngineError> {
        if chunk_batches.len() != self.batches.len() {
            return Err(EngineError::Other(format!(
                "chunk produced {} batches but table has {} sub-schemas",
                chunk_batches.len(),
                self.batches.len()
            )));
        }
        for (seq, batch) in self.batches.iter_mut().zip(chunk_batches) {
            seq.push(batch);
        }
        Ok(())
    }

    /// Number of sub-schemas.
    pub fn sub_schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// The schema for sub-schema `i`.
    pub fn schema(&self, sub_schema_id: usize) -> &Arc<Schema> {
        &self.schemas[sub_schema_id]
    }

    /// The ordered batch sequence for sub-schema `i`.
    pub fn batches(&self, sub_schema_id: usize) -> &[RecordBatch] {
        &self.batches[sub_schema_id]
    }

    /// Total row count across every batch in sub-schema `i`.
    pub fn row_count(&self, sub_schema_id: usize) -> usize {
        self.batches[sub_schema_id].iter().map(|b| b.num_rows()).sum()
    }
}

/// A destination for a finished [`Table`], decoupling the engine from any
/// concrete columnar writer. The engine only ever hands a well-formed batch
/// sequence to this trait; it never encodes bytes itself.
pub trait TableSink {
    /// Write every batch for one sub-schema.
    fn write_sub_schema(
        &mut self,
        sub_schema_id: usize,
        schema: &Arc<Schema>,
        batches: &[RecordBatch],
    ) -> Result<(), EngineError>;

    /// Flush and close any resources opened by `write_sub_schema`.
    fn finish(&mut self) -> Result<(), EngineError>;
}

/// Write every sub-schema in `table` to `sink`, in sub-schema order.
pub fn write_table(table: &Table, sink: &mut dyn TableSink) -> Result<(), EngineError> {
    for sub_schema_id in 0..table.sub_schema_count() {
        sink.write_sub_schema(
            sub_schema_id,
            table.schema(sub_schema_id),
            table.batches(sub_schema_id),
        )?;
    }
    sink.finish()
}
