//! ECMA-335 metadata parsing for .NET PE files.
//!
//! The layers mirror the on-disk structure: the CLI header ([`cor20header`]) points at the
//! metadata root ([`root`]), which lists the [`streams`]. The tables stream describes the
//! row layout of every metadata table, and [`tables`] decodes individual rows. [`view`]
//! ties all of it to a loaded file.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mdfixture::metadata::{tables::ModuleRaw, view::AssemblyView};
//! use std::path::Path;
//!
//! let view = AssemblyView::from_file(Path::new("tests/samples/Sample.dll"))?;
//! if let Some(module) = view.tables().table::<ModuleRaw>()? {
//!     if let Some(row) = module.get(1)? {
//!         println!("Module: {}", view.strings().get(row.name as usize)?);
//!     }
//! }
//! # Ok::<(), mdfixture::Error>(())
//! ```

/// Implementation of the Header of CIL
pub mod cor20header;
/// Implementation of the metadata root
pub mod root;
/// Implementation of the metadata streams
pub mod streams;
/// Implementation of the metadata tables this crate decodes
pub mod tables;
/// Read-only view over the metadata of a loaded binary
pub mod view;
