//! Fixture documents: projecting metadata rows into a generic document and writing it out.
//!
//! A [`Document`] maps section names (`module`, `type_ref`, ...) to arrays of records. Each
//! record is a [`Table`] of [`Node`] values. The [`extract`] functions fill records from an
//! [`crate::metadata::view::AssemblyView`], the [`MetadataWriter`] collects them into a
//! document and [`OutputFormat`] renders it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mdfixture::fixture::{MetadataWriter, OutputFormat, WriterConfig};
//! use mdfixture::metadata::view::AssemblyView;
//! use std::path::Path;
//!
//! let path = Path::new("tests/samples/Sample.dll");
//! let view = AssemblyView::from_file(path)?;
//!
//! let config = WriterConfig {
//!     format: OutputFormat::Json,
//!     ..WriterConfig::default()
//! };
//! let mut writer = MetadataWriter::new(path, config)?;
//! writer.write_all(&view)?;
//! println!("wrote {}", writer.finish()?.display());
//! # Ok::<(), mdfixture::Error>(())
//! ```

pub mod extract;
mod format;
mod writer;

pub use format::OutputFormat;
pub use writer::{write_metadata, MetadataWriter, WriterConfig};

use indexmap::IndexMap;
use serde::Serialize;

/// A single record: field names mapped to values, in insertion order.
pub type Table = IndexMap<String, Node>;

/// A value inside a fixture record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// A signed integer
    Integer(i64),
    /// A text value
    String(String),
    /// A list of values
    Array(Vec<Node>),
    /// A nested record, rendered inline
    Table(Table),
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Integer(i64::from(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Integer(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<Table> for Node {
    fn from(value: Table) -> Self {
        Node::Table(value)
    }
}

/// How string, GUID and blob columns appear in a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeapValues {
    /// The raw heap index, e.g. the `#Strings` offset of a name
    #[default]
    Index,
    /// The heap content: text, lowercase hex for blobs, hyphenated GUIDs.
    /// The nil GUID index stays `0`.
    Resolved,
}

/// An ordered mapping from section names to their records.
///
/// Sections keep the order they were first written in. Writing a section again replaces
/// its records without moving it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    sections: IndexMap<String, Vec<Table>>,
}

impl Document {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the records of section `name`, replacing any earlier ones in place
    pub fn set_section(&mut self, name: &str, records: Vec<Table>) {
        self.sections.insert(name.to_string(), records);
    }

    /// The records of section `name`
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&[Table]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    /// Iterate over all sections in document order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[Table])> {
        self.sections
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Number of sections
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if no section has been written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
