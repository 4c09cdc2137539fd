//! Converts large fixed-width record text files into a columnar, chunked
//! in-memory table, then hands that table to a Parquet or Feather writer.
//!
//! ```text
//! raw bytes -> partitioner -> N parallel (chunk worker -> typed buffers -> record batch)
//!           -> assembler -> ordered batches per sub-schema -> writer (Parquet / Feather)
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use fixarrow::{convert, EngineConfig, FieldSpec, FieldType, RowLayout};
//! use std::fs::File;
//!
//! let layout = RowLayout::single(vec![
//!     FieldSpec::new("idnr", 11, FieldType::Int64),
//!     FieldSpec::new("description", 20, FieldType::String),
//! ]);
//! let config = EngineConfig::new().with_cores(4);
//!
//! let file = File::open("records.txt").unwrap();
//! let size = file.metadata().unwrap().len();
//! let outcome = convert(file, size, &layout, &config).unwrap();
//! println!("parsed {} rows", outcome.total_rows);
//! ```
//!
//! # Key Types
//!
//! - [`RowLayout`] / [`FieldSpec`] / [`FieldType`] — describe a row's byte layout
//! - [`EngineConfig`] — worker count, encoding, header/footer, hashing
//! - [`convert`] / [`ConvertOutcome`] — run a conversion and get back a [`Table`]
//! - [`TableSink`] — write a finished [`Table`] out ([`ParquetSink`], [`FeatherSink`])

#![warn(missing_docs)]

mod chunk;
mod codec;
mod config;
mod err;
mod line;
mod partition;
mod schema;
mod sink;
mod table;

pub use codec::Codec;
pub use config::{CustomColumnBuilders, EngineConfig, SMALL_INPUT_THRESHOLD_BYTES};
pub use err::EngineError;
pub use line::{consume_line, find_last_nl, LineIter, SourceEncoding, TerminatorMode};
pub use partition::{convert, ConvertOutcome};
pub use schema::{FieldSpec, FieldType, RowLayout};
pub use table::{write_table, Table, TableSink};

#[cfg(feature = "parquet")]
pub use sink::ParquetSink;
#[cfg(feature = "feather")]
pub use sink::FeatherSink;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn null_on_bad_integer() {
        let layout = RowLayout::single(vec![FieldSpec::new("a", 5, FieldType::Int32)]);
        let input = b"00042\n  x  \n00007\n".to_vec();
        let config = EngineConfig::new().with_cores(1).with_column_cap(4);
        let outcome = convert(Cursor::new(input.clone()), input.len() as u64, &layout, &config).unwrap();
        assert_eq!(outcome.total_rows, 3);
        let batch = &outcome.table.batches(0)[0];
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow_array::Int32Array>()
            .unwrap();
        assert_eq!(col.value(0), 42);
        assert!(col.is_null(1));
        assert_eq!(col.value(2), 7);
    }

    #[test]
    fn boolean_decoding() {
        let layout = RowLayout::single(vec![FieldSpec::new("flag", 1, FieldType::Boolean)]);
        let input = b"J\nN\nX\ny\n".to_vec();
        let config = EngineConfig::new().with_cores(1).with_column_cap(4);
        let outcome = convert(Cursor::new(input.clone()), input.len() as u64, &layout, &config).unwrap();
        assert_eq!(outcome.total_rows, 4);
        let batch = &outcome.table.batches(0)[0];
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow_array::BooleanArray>()
            .unwrap();
        assert!(col.value(0));
        assert!(!col.value(1));
        assert!(col.is_null(2));
        assert!(col.value(3));
    }

    #[test]
    fn crlf_iso8859_1_with_hash() {
        let layout = RowLayout::single(vec![FieldSpec::new("s", 3, FieldType::String)]);
        let input: Vec<u8> = vec![0xC5, b' ', b' ', b'\r', b'\n'];
        let config = EngineConfig::new()
            .with_cores(1)
            .with_column_cap(4)
            .with_source_encoding(SourceEncoding::Iso8859_1)
            .with_calc_hash(true);
        let outcome = convert(Cursor::new(input.clone()), input.len() as u64, &layout, &config).unwrap();
        assert_eq!(outcome.total_rows, 1);
        let batch = &outcome.table.batches(0)[0];
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow_array::StringArray>()
            .unwrap();
        assert_eq!(col.value(0), "\u{C5}  ");
        assert!(outcome.hash.is_some());
    }

    #[test]
    fn empty_input_produces_empty_table() {
        let layout = RowLayout::single(vec![FieldSpec::new("a", 5, FieldType::Int32)]);
        let config = EngineConfig::new().with_cores(1).with_column_cap(4);
        let outcome = convert(Cursor::new(Vec::new()), 0, &layout, &config).unwrap();
        assert_eq!(outcome.total_rows, 0);
    }

    #[test]
    fn unterminated_final_line_is_parsed() {
        let layout = RowLayout::single(vec![FieldSpec::new("a", 5, FieldType::Int32)]);
        let input = b"00042".to_vec();
        let config = EngineConfig::new().with_cores(1).with_column_cap(4);
        let outcome = convert(Cursor::new(input.clone()), input.len() as u64, &layout, &config).unwrap();
        assert_eq!(outcome.total_rows, 1);
    }

    #[test]
    fn empty_layout_is_a_configuration_error() {
        let layout = RowLayout {
            fields: vec![],
            sub_schema_sizes: vec![],
        };
        let config = EngineConfig::new();
        let result = convert(Cursor::new(Vec::<u8>::new()), 0, &layout, &config);
        assert!(matches!(result, Err(EngineError::EmptyLayout)));
    }
}
