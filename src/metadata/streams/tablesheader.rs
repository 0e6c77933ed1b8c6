use std::sync::Arc;

use bitflags::bitflags;

use crate::{
    file::io::read_le_at,
    metadata::tables::{MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef},
    Error::OutOfBounds,
    Result,
};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    /// `HeapSizes` flags of the tables stream header (ECMA-335 II.24.2.6)
    pub struct HeapSizes: u8 {
        /// `#Strings` indexes are 4 bytes wide
        const LARGE_STRINGS = 0x01;
        /// `#GUID` indexes are 4 bytes wide
        const LARGE_GUID = 0x02;
        /// `#Blob` indexes are 4 bytes wide
        const LARGE_BLOB = 0x04;
        /// 4 bytes of extra data follow the row counts
        const EXTRA_DATA = 0x40;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TableSlot {
    Absent,
    Present { offset: usize, rows: u32 },
    /// Stored after a table of unknown layout, carries the id of that table
    Unreachable(u8),
}

/// The header of the `#~` stream and the location of every table in it.
///
/// The header is followed by one row count per present table and then the tables
/// themselves, back to back in ascending table id order. A table of unknown layout
/// hides every table stored after it; asking for such a table is an error.
pub struct TablesHeader<'a> {
    /// Major version of the table schema
    pub major_version: u8,
    /// Minor version of the table schema
    pub minor_version: u8,
    /// Heap index widths
    pub heap_sizes: HeapSizes,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    data: &'a [u8],
    slots: Vec<TableSlot>,
}

impl<'a> TablesHeader<'a> {
    /// Parse the tables stream header and locate the tables.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the header or a locatable table exceeds the
    /// stream.
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        let mut offset = 4_usize;
        let major_version = read_le_at::<u8>(data, &mut offset)?;
        let minor_version = read_le_at::<u8>(data, &mut offset)?;
        let heap_sizes = HeapSizes::from_bits_retain(read_le_at::<u8>(data, &mut offset)?);
        offset += 1;
        let valid = read_le_at::<u64>(data, &mut offset)?;
        let sorted = read_le_at::<u64>(data, &mut offset)?;

        let mut row_counts = [0_u32; 64];
        for (id, rows) in row_counts.iter_mut().enumerate() {
            if valid & (1 << id) != 0 {
                *rows = read_le_at::<u32>(data, &mut offset)?;
            }
        }

        if heap_sizes.contains(HeapSizes::EXTRA_DATA) {
            read_le_at::<u32>(data, &mut offset)?;
        }

        let info = Arc::new(TableInfo::new(&row_counts, heap_sizes));

        let mut slots = vec![TableSlot::Absent; 64];
        let mut unknown: Option<u8> = None;
        for id in 0..64_u8 {
            if valid & (1 << id) == 0 {
                continue;
            }

            if let Some(unknown) = unknown {
                slots[id as usize] = TableSlot::Unreachable(unknown);
                continue;
            }

            let rows = row_counts[id as usize];
            let Some(table) = TableId::from_repr(id) else {
                log::warn!("Unknown metadata table 0x{:02X} with {} rows", id, rows);
                unknown = Some(id);
                slots[id as usize] = TableSlot::Unreachable(id);
                continue;
            };

            let size = (rows as usize).saturating_mul(info.row_size(table) as usize);
            let end = offset.checked_add(size).ok_or(OutOfBounds)?;
            if end > data.len() {
                return Err(OutOfBounds);
            }

            slots[id as usize] = TableSlot::Present { offset, rows };
            offset = end;
        }

        Ok(TablesHeader {
            major_version,
            minor_version,
            heap_sizes,
            valid,
            sorted,
            info,
            data,
            slots,
        })
    }

    /// Number of present tables
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Returns `true` if `table` is present in the stream
    #[must_use]
    pub fn has_table(&self, table: TableId) -> bool {
        self.valid & (1 << table as u8) != 0
    }

    /// Row count of `table`, 0 if absent
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.info.get(table).rows
    }

    /// The typed table of row type `T`, `None` if the table is absent.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the table is stored after a table of unknown
    /// layout.
    pub fn table<T: RowReadable>(&self) -> Result<Option<MetadataTable<'a, T>>> {
        match self.slots[T::TABLE_ID as usize] {
            TableSlot::Absent => Ok(None),
            TableSlot::Present { offset, rows } => {
                MetadataTable::new(&self.data[offset..], rows, self.info.clone()).map(Some)
            }
            TableSlot::Unreachable(unknown) => Err(malformed_error!(
                "Table {} is stored after unknown table 0x{:02X}",
                T::TABLE_ID.name(),
                unknown
            )),
        }
    }
}
