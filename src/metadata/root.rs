//! The metadata root (ECMA-335 II.24.2.1).

use crate::{
    file::io::read_le_at,
    metadata::streams::StreamHeader,
    Error::OutOfBounds,
    Result,
};

/// Signature of the metadata root, `BSJB`
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// The metadata root: version information and the stream directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Root {
    /// Always [`CIL_HEADER_MAGIC`]
    pub signature: u32,
    /// Major version, 1
    pub major_version: u16,
    /// Minor version, 1
    pub minor_version: u16,
    /// Reserved, always 0
    pub reserved: u32,
    /// Length of the padded version string
    pub length: u32,
    /// Runtime version the binary was built against, e.g. `v4.0.30319`
    pub version: String,
    /// Reserved, always 0
    pub flags: u16,
    /// Number of streams
    pub stream_number: u16,
    /// Stream headers in file order
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Read the metadata root from the start of `data`.
    ///
    /// Stream names are not checked for duplicates or known values here.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a wrong signature or a stream outside of the
    /// metadata, and [`crate::Error::OutOfBounds`] for truncated data.
    pub fn read(data: &[u8]) -> Result<Root> {
        let mut offset = 0_usize;

        let signature = read_le_at::<u32>(data, &mut offset)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - 0x{:08X}",
                signature
            ));
        }

        let major_version = read_le_at::<u16>(data, &mut offset)?;
        let minor_version = read_le_at::<u16>(data, &mut offset)?;
        let reserved = read_le_at::<u32>(data, &mut offset)?;
        let length = read_le_at::<u32>(data, &mut offset)?;

        let Some(version_data) = offset
            .checked_add(length as usize)
            .and_then(|end| data.get(offset..end))
        else {
            return Err(OutOfBounds);
        };

        let version_len = version_data
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_data.len());
        let version = String::from_utf8_lossy(&version_data[..version_len]).into_owned();
        offset += length as usize;

        let flags = read_le_at::<u16>(data, &mut offset)?;
        let stream_number = read_le_at::<u16>(data, &mut offset)?;

        let mut stream_headers = Vec::with_capacity(stream_number as usize);
        for _ in 0..stream_number {
            let stream = StreamHeader::read(data, &mut offset)?;

            match stream.offset.checked_add(stream.size) {
                Some(end) if end as usize <= data.len() => {}
                Some(_) => {
                    return Err(malformed_error!(
                        "Stream {} exceeds the metadata - offset {}, size {}",
                        stream.name,
                        stream.offset,
                        stream.size
                    ))
                }
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        stream.offset,
                        stream.size
                    ))
                }
            }

            stream_headers.push(stream);
        }

        Ok(Root {
            signature,
            major_version,
            minor_version,
            reserved,
            length,
            version,
            flags,
            stream_number,
            stream_headers,
        })
    }
}
