//! Chunk worker: parses one line-aligned byte slice into one record batch
//! per sub-schema.

use std::sync::Arc;
use std::time::{Duration, Instant};

use arrow_array::RecordBatch;
use arrow_schema::Schema;
use log::warn;

use crate::codec::Codec;
use crate::config::CustomColumnBuilders;
use crate::err::EngineError;
use crate::line::{consume_line, LineIter, SourceEncoding};
use crate::schema::RowLayout;

/// The result of parsing one chunk: one record batch per sub-schema, the
/// header/footer strings if this chunk captured them, the number of data
/// rows parsed, and how long parsing took.
pub struct ChunkResult {
    /// One batch per sub-schema, in sub-schema order.
    pub batches: Vec<RecordBatch>,
    /// The captured header line (only set on the chunk where `is_header_chunk`).
    pub header: Option<String>,
    /// The captured footer line (only set on the chunk where `is_footer_chunk`).
    pub footer: Option<String>,
    /// Number of data rows parsed in this chunk (excludes header/footer).
    pub lines_parsed: usize,
    /// Wall-clock time spent parsing this chunk.
    pub parse_duration: Duration,
}

/// Parse `bytes` (a line-aligned, terminator-complete slice) against
/// `layout`, producing one record batch per sub-schema.
///
/// `is_header_chunk`/`is_footer_chunk` mark whether this is chunk 0 / the
/// last chunk, respectively, when header/footer capture is enabled.
pub fn run_chunk(
    bytes: &[u8],
    layout: &RowLayout,
    schemas: &[Arc<Schema>],
    encoding: SourceEncoding,
    column_cap: usize,
    registry: &CustomColumnBuilders,
    is_header_chunk: bool,
    is_footer_chunk: bool,
) -> Result<ChunkResult, EngineError> {
    let start = Instant::now();

    let (body, footer) = if is_footer_chunk {
        split_off_footer(bytes, encoding)
    } else {
        (bytes, None)
    };

    let mut codecs: Vec<Codec> = layout
        .fields
        .iter()
        .map(|f| registry.build(f.source_type, column_cap))
        .collect();

    let mut header: Option<String> = None;
    let mut lines_parsed = 0usize;
    let mut parse_failures = 0usize;
    let mut first_line = true;

    for line in LineIter::new(body, encoding) {
        if is_header_chunk && first_line {
            header = Some(line);
            first_line = false;
            continue;
        }
        first_line = false;

        let mut offset = 0usize;
        for (field, codec) in layout.fields.iter().zip(codecs.iter_mut()) {
            match consume_line(&line, offset, field.byte_length) {
                Some(slice) => {
                    if !codec.parse_value(slice) {
                        parse_failures += 1;
                    }
                }
                None => {
                    codec.append_null();
                    parse_failures += 1;
                }
            }
            offset += field.byte_length;
        }
        lines_parsed += 1;
    }

    if parse_failures > 0 {
        warn!("{parse_failures} field(s) failed to parse and were set null in this chunk");
    }

    let columns: Vec<_> = codecs.iter_mut().map(|c| c.finish_column()).collect();

    let mut batches = Vec::with_capacity(schemas.len());
    for (sub_schema_id, schema) in schemas.iter().enumerate() {
        let sub_schema_columns: Vec<_> = layout
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.sub_schema_id == sub_schema_id)
            .map(|(i, _)| columns[i].clone())
            .collect();
        batches.push(RecordBatch::try_new(schema.clone(), sub_schema_columns)?);
    }

    Ok(ChunkResult {
        batches,
        header,
        footer,
        lines_parsed,
        parse_duration: start.elapsed(),
    })
}

/// Locate the terminator bounding the last line in `bytes` and split it off
/// as the footer string, returning the remaining body and the footer.
///
/// `find_last_nl` returns the offset immediately *after* a terminator, so
/// when the footer line is itself terminated (the normal case) it lands on
/// `bytes.len()` exactly. Strip one trailing terminator before searching so
/// the search finds the terminator bounding the footer from the body,
/// rather than the footer line's own trailing terminator.
fn split_off_footer(bytes: &[u8], encoding: SourceEncoding) -> (&[u8], Option<String>) {
    use crate::line::{find_last_nl, TerminatorMode};

    let mode = encoding.terminator_mode();
    let terminator: &[u8] = match mode {
        TerminatorMode::Lf => b"\n",
        TerminatorMode::CrLf => b"\r\n",
    };

    let search_region = bytes.strip_suffix(terminator).unwrap_or(bytes);
    let footer_start = find_last_nl(search_region, mode).unwrap_or(0);

    let body = &bytes[..footer_start];
    let footer_bytes = &bytes[footer_start..];
    let footer_line = LineIter::new(footer_bytes, encoding).next();
    (body, footer_line)
}
