//! CLI dispatch logic for the fixarrow binary.

use log::debug;

use fixarrow::{convert, write_table, EngineConfig, EngineError, TableSink};

use crate::cli::{CliOutFormat, FixarrowCli, FixarrowCliCommands};

/// Executes the CLI command specified by the parsed [`FixarrowCli`] arguments.
pub fn run(cli: FixarrowCli) -> Result<(), EngineError> {
    env_logger::init();

    match cli.command {
        FixarrowCliCommands::Convert {
            input,
            layout,
            output,
            format,
            cores,
            column_cap,
            encoding,
            has_header,
            has_footer,
            calc_hash,
        } => {
            debug!("Loading row layout from {}", layout.to_string_lossy());
            let row_layout = EngineConfig::load_layout(&layout)?;

            debug!("Reading fixed-width data from {}", input.to_string_lossy());
            let file = std::fs::File::open(&input)?;
            let size = file.metadata()?.len();

            let config = EngineConfig::new()
                .with_cores(cores)
                .with_column_cap(column_cap)
                .with_source_encoding(encoding.into())
                .with_header(has_header)
                .with_footer(has_footer)
                .with_calc_hash(calc_hash);

            let outcome = convert(file, size, &row_layout, &config)?;

            println!(
                "Parsed {} rows across {} chunks",
                outcome.total_rows, outcome.chunk_count
            );
            if let Some(hash) = outcome.hash {
                println!("SHA-256: {}", hex_encode(&hash));
            }

            let sub_schema_count = outcome.table.sub_schema_count();
            let mut sink: Box<dyn TableSink> = match format {
                #[cfg(feature = "parquet")]
                CliOutFormat::Parquet => Box::new(fixarrow::ParquetSink::new(output, sub_schema_count)),
                #[cfg(not(feature = "parquet"))]
                CliOutFormat::Parquet => {
                    return Err(EngineError::Other(
                        "parquet output requires the parquet feature".to_string(),
                    ));
                }
                #[cfg(feature = "feather")]
                CliOutFormat::Feather => Box::new(fixarrow::FeatherSink::new(output, sub_schema_count)),
                #[cfg(not(feature = "feather"))]
                CliOutFormat::Feather => {
                    return Err(EngineError::Other(
                        "feather output requires the feather feature".to_string(),
                    ));
                }
            };

            write_table(&outcome.table, sink.as_mut())?;
            Ok(())
        }
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(out, "{b:02x}").unwrap();
    }
    out
}
