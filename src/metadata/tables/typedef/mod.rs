//! # TypeDef Table Module
//!
//! The `TypeDef` table (0x02) holds every type defined in this module. Row 1 is the
//! pseudo type `<Module>` holding global fields and methods.

mod reader;

use crate::metadata::tables::CodedIndex;

/// A row of the `TypeDef` table, with heap indexes left unresolved.
///
/// `field_list` and `method_list` mark the first field and method of the type; the run
/// ends where the list of the next row begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefRaw {
    /// The 1-based row id
    pub rid: u32,
    /// Offset of the row within the table data
    pub offset: usize,
    /// `TypeAttributes` bitmask (ECMA-335 II.23.1.15)
    pub flags: u32,
    /// `#Strings` index of the type name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
    /// `TypeDefOrRef` coded index of the base type, nil for interfaces and `<Module>`
    pub extends: CodedIndex,
    /// Index into the `Field` table
    pub field_list: u32,
    /// Index into the `MethodDef` table
    pub method_list: u32,
}
