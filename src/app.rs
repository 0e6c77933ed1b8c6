use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use mdfixture::{HeapValues, OutputFormat, WriterConfig};

/// mdfixture - dump .NET metadata tables into TOML or JSON test fixtures
#[derive(Debug, Parser)]
#[command(name = "mdfixture", version, about, long_about = None)]
pub struct Cli {
    /// Paths to the .NET binaries, one fixture is written per binary.
    #[arg(value_name = "FILE", required = true)]
    pub paths: Vec<PathBuf>,

    /// Directory the fixtures are written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format of the fixtures.
    #[arg(long, value_enum, default_value_t = Format::Toml)]
    pub format: Format,

    /// Emit heap contents (strings, hex blobs, GUIDs) instead of heap indexes.
    #[arg(long)]
    pub resolve_heaps: bool,

    /// Leave out the assembly_ref section.
    #[arg(long)]
    pub no_assembly_refs: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Toml,
    Json,
}

impl Cli {
    /// The writer options selected on the command line.
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            output_dir: self.output_dir.clone(),
            format: match self.format {
                Format::Toml => OutputFormat::Toml,
                Format::Json => OutputFormat::Json,
            },
            heap_values: if self.resolve_heaps {
                HeapValues::Resolved
            } else {
                HeapValues::Index
            },
            assembly_refs: !self.no_assembly_refs,
        }
    }
}
