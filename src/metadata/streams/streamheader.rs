use crate::{file::io::read_le_at, Error::OutOfBounds, Result};

/// Longest stream name ECMA-335 II.24.2.2 allows, without the terminator
const MAX_NAME_LEN: usize = 32;

/// A stream header of the metadata root: location and name of one stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset of the stream, relative to the metadata root
    pub offset: u32,
    /// Size of the stream in bytes
    pub size: u32,
    /// Name of the stream, e.g. `#~` or `#Strings`
    pub name: String,
}

impl StreamHeader {
    /// Read a stream header at `offset`, advancing past its 4-byte aligned name.
    ///
    /// Unknown names are accepted; the caller decides which streams it needs.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the header is truncated, or
    /// [`crate::Error::Malformed`] if the name is unterminated or not ASCII.
    pub fn read(data: &[u8], offset: &mut usize) -> Result<StreamHeader> {
        let stream_offset = read_le_at::<u32>(data, offset)?;
        let size = read_le_at::<u32>(data, offset)?;

        let Some(name_data) = data.get(*offset..) else {
            return Err(OutOfBounds);
        };

        let Some(name_len) = name_data
            .iter()
            .take(MAX_NAME_LEN + 1)
            .position(|byte| *byte == 0)
        else {
            return Err(malformed_error!(
                "Stream name at offset {} is not terminated",
                offset
            ));
        };

        let name = &name_data[..name_len];
        if !name.is_ascii() {
            return Err(malformed_error!("Invalid stream header name - {:?}", name));
        }

        // name and terminator are padded to the next 4 byte boundary
        let name_aligned = (name_len + 1 + 3) & !3;
        *offset += name_aligned;

        Ok(StreamHeader {
            offset: stream_offset,
            size,
            name: String::from_utf8_lossy(name).into_owned(),
        })
    }
}
