//! # AssemblyRef Table Module
//!
//! The `AssemblyRef` table (0x23) lists the assemblies this module references.

mod reader;

/// A row of the `AssemblyRef` table, with heap indexes left unresolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyRefRaw {
    /// The 1-based row id
    pub rid: u32,
    /// Offset of the row within the table data
    pub offset: usize,
    /// Major version
    pub major_version: u32,
    /// Minor version
    pub minor_version: u32,
    /// Build number
    pub build_number: u32,
    /// Revision number
    pub revision_number: u32,
    /// `AssemblyFlags` bitmask, `0x0001` marks a full public key
    pub flags: u32,
    /// `#Blob` index of the public key or its token
    pub public_key_or_token: u32,
    /// `#Strings` index of the assembly name
    pub name: u32,
    /// `#Strings` index of the culture, 0 for neutral
    pub culture: u32,
    /// `#Blob` index of the hash value
    pub hash_value: u32,
}
