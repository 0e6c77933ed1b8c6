// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # mdfixture
//!
//! Dumps the structural metadata of .NET PE executables into test fixtures.
//!
//! The crate opens a binary read-only, locates the ECMA-335 metadata through the CLI header
//! and reads a handful of metadata tables directly from their on-disk layout: the `Module`
//! row, every `TypeRef`, every `TypeDef` and every `AssemblyRef`. Selected columns of each
//! row are projected into a generic [`fixture::Document`], which is rendered as TOML or JSON
//! into one file per binary, named after it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdfixture::{write_metadata, WriterConfig};
//! use std::path::Path;
//!
//! let path = write_metadata(Path::new("tests/samples/Sample.dll"), &WriterConfig::default())?;
//! println!("wrote {}", path.display());
//! # Ok::<(), mdfixture::Error>(())
//! ```
//!
//! The resulting `Sample.toml` looks like
//!
//! ```toml
//! [[module]]
//! name = 10
//! mvid = 1
//! enc_id = 0
//! enc_base_id = 0
//!
//! [[type_ref]]
//! name = 40
//! namespace = 33
//! resolution_scope = { kind = "AssemblyReference", row_id = 1 }
//! ```
//!
//! ## Reading metadata directly
//!
//! ```rust,no_run
//! use mdfixture::metadata::{tables::TypeRefRaw, view::AssemblyView};
//! use std::path::Path;
//!
//! let view = AssemblyView::from_file(Path::new("tests/samples/Sample.dll"))?;
//! if let Some(type_refs) = view.tables().table::<TypeRefRaw>()? {
//!     for row in type_refs.iter() {
//!         let row = row?;
//!         println!(
//!             "{}.{}",
//!             view.strings().get(row.type_namespace as usize)?,
//!             view.strings().get(row.type_name as usize)?
//!         );
//!     }
//! }
//! # Ok::<(), mdfixture::Error>(())
//! ```

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Fixture documents, field extractors and the writer
pub mod fixture;

/// Definitions and parsing of CIL metadata based on ECMA-335
///
/// - [`metadata::cor20header`] - CLI header
/// - [`metadata::root`] - Metadata root and stream directory
/// - [`metadata::streams`] - Tables stream and the `#Strings`, `#GUID` and `#Blob` heaps
/// - [`metadata::tables`] - Row types and index width computation
/// - [`metadata::view`] - The parsed metadata of one binary
pub mod metadata;

/// `mdfixture` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `mdfixture` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use mdfixture::{metadata::view::AssemblyView, Error};
///
/// match AssemblyView::from_file(std::path::Path::new("tests/samples/native.exe")) {
///     Ok(_) => println!("Loaded successfully"),
///     Err(Error::NotSupported) => println!("File format not supported"),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

pub use fixture::{
    write_metadata, Document, HeapValues, MetadataWriter, Node, OutputFormat, Table,
    WriterConfig,
};

/// The loaded PE image
pub use file::File;
