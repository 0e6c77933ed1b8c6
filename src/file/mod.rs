//! PE container access for .NET binaries.
//!
//! [`File`] owns the raw bytes of a binary through a [`Backend`] and the `goblin` PE view
//! borrowed from them. It only knows about the PE layer: where the CLR runtime header lives
//! and how to translate relative virtual addresses into file offsets. Everything ECMA-335
//! specific is handled in [`crate::metadata`].
//!
//! # Backends
//! - [`physical::Physical`] - memory-mapped file on disk
//! - [`memory::Memory`] - owned byte buffer

pub mod io;
pub mod memory;
pub mod parser;
pub mod physical;

use std::path::Path;

use goblin::pe::PE;
use log::debug;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

use crate::{
    Error::{Empty, GoblinErr},
    Result,
};

/// Read access to the bytes of a loaded binary.
///
/// Implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the complete data.
    fn data(&self) -> &[u8];

    /// Returns the total size of the data.
    fn len(&self) -> usize;
}

#[self_referencing]
/// A parsed PE file together with the data it was parsed from.
///
/// Loading fails for anything that is not a PE image with an optional header and a
/// CLR runtime header data directory.
pub struct File {
    /// The backend holding the raw bytes
    data: Box<dyn Backend>,
    /// The parsed PE structure, referencing the data.
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Loads a PE file from disk through a read-only memory mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or mapped
    /// - The file is empty
    /// - The file is not a valid PE image
    /// - The PE image does not carry a CLR runtime header
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Loads a PE file from a memory buffer.
    ///
    /// # Errors
    ///
    /// Same as [`File::from_file`], minus the filesystem errors.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        File::try_new(data, |data| {
            let pe = PE::parse(data.data()).map_err(GoblinErr)?;
            let Some(optional_header) = pe.header.optional_header.as_ref() else {
                return Err(malformed_error!("File does not have an OptionalHeader"));
            };

            if optional_header
                .data_directories
                .get_clr_runtime_header()
                .is_none()
            {
                return Err(malformed_error!(
                    "File does not have a CLR runtime header directory"
                ));
            }

            debug!("parsed PE image with {} sections", pe.sections.len());
            Ok(pe)
        })
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the file has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `(rva, size)` of the CLR runtime header.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the directory is missing, which [`File`]
    /// already rejects while loading.
    pub fn clr(&self) -> Result<(usize, usize)> {
        self.with_pe(|pe| {
            let clr_dir = pe
                .header
                .optional_header
                .as_ref()
                .and_then(|oh| oh.data_directories.get_clr_runtime_header())
                .ok_or_else(|| malformed_error!("CLR runtime header directory missing"))?;

            Ok((clr_dir.virtual_address as usize, clr_dir.size as usize))
        })
    }

    /// Returns the complete file data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// Returns `len` bytes of the file starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the file.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Translates a relative virtual address into a file offset using the section table.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if no section contains `rva`.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 =
            u32::try_from(rva).map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let Some(section_max) = section.virtual_address.checked_add(section.virtual_size)
                else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        section.virtual_size
                    ));
                };

                if section.virtual_address <= rva_u32 && section_max > rva_u32 {
                    return Ok((rva - section.virtual_address as usize)
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}
