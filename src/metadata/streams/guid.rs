use crate::{Error::OutOfBounds, Result};

/// The `#GUID` heap: 16 byte GUIDs addressed by 1-based index.
///
/// Index 0 is the nil reference and never resolves.
pub struct Guid<'a> {
    data: &'a [u8],
}

impl<'a> Guid<'a> {
    /// Create a view over the heap data
    #[must_use]
    pub fn from(data: &'a [u8]) -> Guid<'a> {
        Guid { data }
    }

    /// Get the GUID with the 1-based `index`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for index 0 or an index past the heap
    pub fn get(&self, index: usize) -> Result<uguid::Guid> {
        if index < 1 {
            return Err(OutOfBounds);
        }

        let offset_start = (index - 1) * 16;
        let Some(bytes) = self.data.get(offset_start..offset_start + 16) else {
            return Err(OutOfBounds);
        };

        let mut buffer = [0u8; 16];
        buffer.copy_from_slice(bytes);

        Ok(uguid::Guid::from_bytes(buffer))
    }

    /// Number of GUIDs in the heap
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / 16
    }

    /// Returns `true` if the heap holds no GUID
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
