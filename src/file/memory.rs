//! In-memory backend for binaries that are already loaded into a buffer.

use super::Backend;
use crate::{Error::OutOfBounds, Result};

/// A backend owning the complete binary as a byte vector.
///
/// Used by [`crate::file::File::from_mem`], mainly for binaries produced on the fly
/// in tests or read from an archive.
#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Create a new in-memory backend from `data`.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Memory { data }
    }
}

impl Backend for Memory {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if offset_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
