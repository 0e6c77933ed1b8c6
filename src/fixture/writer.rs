use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    fixture::{extract, Document, HeapValues, OutputFormat, Table},
    metadata::view::AssemblyView,
    Result,
};

/// Options of a fixture run.
///
/// The default writes TOML with raw heap indexes into the current directory and includes
/// the `assembly_ref` section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    /// Directory the fixture file is written to, created if missing
    pub output_dir: PathBuf,
    /// Text format of the fixture
    pub format: OutputFormat,
    /// How string, GUID and blob columns are emitted
    pub heap_values: HeapValues,
    /// Emit the `assembly_ref` section
    pub assembly_refs: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            output_dir: PathBuf::from("."),
            format: OutputFormat::default(),
            heap_values: HeapValues::default(),
            assembly_refs: true,
        }
    }
}

/// Collects fixture sections for one binary and writes them as a single file.
///
/// Nothing touches the filesystem before [`MetadataWriter::finish`], which renders the
/// whole document and writes it in one call.
pub struct MetadataWriter {
    output: PathBuf,
    config: WriterConfig,
    document: Document,
}

impl MetadataWriter {
    /// Create a writer for the binary at `assembly_path`.
    ///
    /// The fixture is named after the file stem of `assembly_path`, e.g. `Sample.dll`
    /// becomes `Sample.toml`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if `assembly_path` has no file name
    pub fn new(assembly_path: &Path, config: WriterConfig) -> Result<Self> {
        let Some(stem) = assembly_path.file_stem() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} has no file name", assembly_path.display()),
            )
            .into());
        };

        // the stem keeps its own dots, `System.Runtime.dll` becomes `System.Runtime.toml`
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(config.format.extension());
        let output = config.output_dir.join(name);

        Ok(MetadataWriter {
            output,
            config,
            document: Document::new(),
        })
    }

    /// Write `records` as the section `name`, replacing an earlier section of that name
    pub fn write_section<I>(&mut self, name: &str, records: I)
    where
        I: IntoIterator<Item = Table>,
    {
        self.document
            .set_section(name, records.into_iter().collect());
    }

    /// Run all configured extractors against `view`.
    ///
    /// Sections are written in the order `module`, `type_ref`, `type_def`, `assembly_ref`.
    ///
    /// # Errors
    /// Returns the first extractor error
    pub fn write_all(&mut self, view: &AssemblyView) -> Result<()> {
        let heaps = self.config.heap_values;

        self.write_section(extract::MODULE, [extract::module(view, heaps)?]);
        self.write_section(extract::TYPE_REF, extract::type_refs(view, heaps)?);
        self.write_section(extract::TYPE_DEF, extract::type_defs(view, heaps)?);
        if self.config.assembly_refs {
            self.write_section(extract::ASSEMBLY_REF, extract::assembly_refs(view, heaps)?);
        }

        Ok(())
    }

    /// The document collected so far
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The path [`MetadataWriter::finish`] writes to
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Render the document in the configured format
    ///
    /// # Errors
    /// Returns [`crate::Error::Serialize`] if rendering fails
    pub fn render(&self) -> Result<String> {
        self.config.format.render(&self.document)
    }

    /// Render the document and write it to [`MetadataWriter::output_path`].
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the output directory cannot be created or the
    /// file cannot be written
    pub fn finish(self) -> Result<PathBuf> {
        let text = self.render()?;

        fs::create_dir_all(&self.config.output_dir)?;
        fs::write(&self.output, text)?;

        info!("wrote {}", self.output.display());
        Ok(self.output)
    }
}

/// Open the binary at `assembly_path`, extract all configured sections and write the
/// fixture. Returns the path of the written file.
///
/// # Errors
/// Returns an error if the binary cannot be opened or parsed, or the fixture cannot be
/// written
pub fn write_metadata(assembly_path: &Path, config: &WriterConfig) -> Result<PathBuf> {
    let view = AssemblyView::from_file(assembly_path)?;

    let mut writer = MetadataWriter::new(assembly_path, config.clone())?;
    writer.write_all(&view)?;
    writer.finish()
}
