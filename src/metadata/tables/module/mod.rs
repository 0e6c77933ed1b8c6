//! # Module Table Module
//!
//! The `Module` table (0x00) describes the module itself: its name, its version id (Mvid)
//! and the edit-and-continue generation ids. A valid binary has exactly one row.

mod reader;

/// A row of the `Module` table, with heap indexes left unresolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleRaw {
    /// The 1-based row id
    pub rid: u32,
    /// Offset of the row within the table data
    pub offset: usize,
    /// Reserved, always zero
    pub generation: u32,
    /// `#Strings` index of the module name
    pub name: u32,
    /// `#GUID` index of the module version id
    pub mvid: u32,
    /// `#GUID` index of the edit-and-continue generation id
    pub encid: u32,
    /// `#GUID` index of the edit-and-continue base generation id
    pub encbaseid: u32,
}
