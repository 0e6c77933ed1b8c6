//! Metadata tables of the `#~` stream.
//!
//! Every table with a known column layout can be located; rows are decoded for the tables
//! fixtures are extracted from:
//! - [`ModuleRaw`] - `Module` (0x00)
//! - [`TypeRefRaw`] - `TypeRef` (0x01)
//! - [`TypeDefRaw`] - `TypeDef` (0x02)
//! - [`AssemblyRefRaw`] - `AssemblyRef` (0x23)
//!
//! # Reference
//! * [ECMA-335 Partition II, Section 22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod assemblyref;
mod module;
mod typedef;
mod typeref;
mod types;

pub use assemblyref::AssemblyRefRaw;
pub use module::ModuleRaw;
pub use typedef::TypeDefRaw;
pub use typeref::TypeRefRaw;
pub use types::*;
