//! Partitioner / coordinator: splits the input into line-aligned chunks,
//! dispatches a worker per chunk, and gathers the results back in order.

use std::io::Read;

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::chunk::run_chunk;
use crate::config::{CustomColumnBuilders, EngineConfig};
use crate::err::EngineError;
use crate::line::find_last_nl;
use crate::schema::RowLayout;
use crate::table::Table;

/// Everything the coordinator produces from a single run, beyond the table
/// itself.
pub struct ConvertOutcome {
    /// The assembled, ordered per-sub-schema batch sequences.
    pub table: Table,
    /// The captured header line, if `has_header` was set.
    pub header: Option<String>,
    /// The captured footer line, if `has_footer` was set.
    pub footer: Option<String>,
    /// Total data rows across all chunks (excludes header/footer).
    pub total_rows: usize,
    /// SHA-256 of the raw input bytes, in ingest order, if `calc_hash` was set.
    pub hash: Option<[u8; 32]>,
    /// Number of chunks the input was split into (after the small-input override).
    pub chunk_count: usize,
}

/// Read `size` bytes from `reader`, partition them into line-aligned chunks
/// per `config`, parse each chunk against `layout`, and assemble the result.
pub fn convert<R: Read>(
    mut reader: R,
    size: u64,
    layout: &RowLayout,
    config: &EngineConfig,
) -> Result<ConvertOutcome, EngineError> {
    layout.validate()?;
    config.validate()?;

    let cores = config.resolve_cores(size);
    let size_usize = size as usize;
    let mut master = vec![0u8; size_usize];

    let mode = config.source_encoding.terminator_mode();
    let mut hasher = if config.calc_hash { Some(Sha256::new()) } else { None };

    let raw_chunk_size = if cores == 0 {
        size_usize
    } else {
        size_usize.div_ceil(cores)
    };

    let mut ranges = Vec::with_capacity(cores);
    let mut pos = 0usize;
    for i in 0..cores {
        let is_last = i == cores - 1;
        let raw_end = if is_last {
            size_usize
        } else {
            (pos + raw_chunk_size).min(size_usize)
        };

        reader.read_exact(&mut master[pos..raw_end])?;
        if let Some(hasher) = hasher.as_mut() {
            hasher.update(&master[pos..raw_end]);
        }

        let end = if is_last {
            raw_end
        } else {
            match find_last_nl(&master[pos..raw_end], mode) {
                Some(offset) => pos + offset,
                None => {
                    return Err(EngineError::AlignmentError {
                        start: pos,
                        end: raw_end,
                    });
                }
            }
        };

        ranges.push((pos, end));
        pos = end;
    }

    let schemas = layout.schemas();
    let registry = CustomColumnBuilders::new();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cores)
        .build()?;

    let last_index = ranges.len().saturating_sub(1);
    let results: Vec<Result<crate::chunk::ChunkResult, EngineError>> = pool.install(|| {
        ranges
            .par_iter()
            .enumerate()
            .map(|(i, &(start, end))| {
                run_chunk(
                    &master[start..end],
                    layout,
                    &schemas,
                    config.source_encoding,
                    config.column_cap,
                    &registry,
                    config.has_header && i == 0,
                    config.has_footer && i == last_index,
                )
            })
            .collect()
    });

    let mut table = Table::new(schemas);
    let mut header = None;
    let mut footer = None;
    let mut total_rows = 0usize;

    for result in results {
        let chunk = result?;
        table.append_chunk(chunk.batches)?;
        if chunk.header.is_some() {
            header = chunk.header;
        }
        if chunk.footer.is_some() {
            footer = chunk.footer;
        }
        total_rows += chunk.lines_parsed;
    }

    Ok(ConvertOutcome {
        table,
        header,
        footer,
        total_rows,
        hash: hasher.map(|h| h.finalize().into()),
        chunk_count: ranges.len(),
    })
}
