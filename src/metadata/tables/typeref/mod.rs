//! # TypeRef Table Module
//!
//! The `TypeRef` table (0x01) lists types defined in other modules or assemblies, each with
//! the scope it is resolved in.

mod reader;

use crate::metadata::tables::CodedIndex;

/// A row of the `TypeRef` table, with heap indexes left unresolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRefRaw {
    /// The 1-based row id
    pub rid: u32,
    /// Offset of the row within the table data
    pub offset: usize,
    /// `ResolutionScope` coded index: Module, ModuleRef, AssemblyRef or an enclosing TypeRef
    pub resolution_scope: CodedIndex,
    /// `#Strings` index of the type name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
}
