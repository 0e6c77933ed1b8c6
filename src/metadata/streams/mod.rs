//! Metadata streams (ECMA-335 II.24.2).
//!
//! - [`TablesHeader`] - the `#~` (or uncompressed `#-`) tables stream
//! - [`Strings`] - the `#Strings` heap
//! - [`Guid`] - the `#GUID` heap
//! - [`Blob`] - the `#Blob` heap
//!
//! The `#US` heap holds user string literals and is not needed for fixtures.

mod blob;
mod guid;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use guid::Guid;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::{HeapSizes, TablesHeader};
