//! Generic table access shared by all row types.
//!
//! [`MetadataTable`] is a typed view over the bytes of one table. Rows are decoded lazily by
//! the [`RowReadable`] implementation of the row type, so iterating a table never allocates
//! more than the rows the caller keeps.

mod codedindex;
mod rowsize;
mod tableid;
mod tableinfo;

use std::marker::PhantomData;

use crate::{Error::OutOfBounds, Result};

pub use codedindex::{CodedIndex, CodedIndexType};
pub use tableid::TableId;
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};

/// Decoding of a single table row.
pub trait RowReadable: Sized {
    /// The table rows of this type are stored in
    const TABLE_ID: TableId;

    /// Read one row at `offset`, advancing it by exactly one row.
    ///
    /// ## Arguments
    /// * 'data'    - The table data
    /// * 'offset'  - Position of the row within `data`
    /// * 'rid'     - The 1-based row id
    /// * 'sizes'   - Index widths of the tables stream
    ///
    /// # Errors
    /// Returns an error if the row does not fit into `data`.
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// A typed, lazily decoded metadata table.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a table view over `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `row_count` rows.
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = sizes.row_size(T::TABLE_ID);
        if (row_count as usize).saturating_mul(row_size as usize) > data.len() {
            return Err(OutOfBounds);
        }

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Size of the table in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.row_size)
    }

    /// Size of one row in bytes
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Decode the row with the 1-based id `rid`.
    ///
    /// Returns `None` for `rid == 0` and for ids past the end of the table.
    ///
    /// # Errors
    /// Returns an error if the row cannot be decoded.
    pub fn get(&self, rid: u32) -> Result<Option<T>> {
        if rid == 0 || self.row_count < rid {
            return Ok(None);
        }

        let mut offset = (rid as usize - 1) * self.row_size as usize;
        T::row_read(self.data, &mut offset, rid, &self.sizes).map(Some)
    }

    /// Iterate all rows in table order
    #[must_use]
    pub fn iter(&self) -> TableIterator<'_, 'a, T> {
        TableIterator {
            table: self,
            current_row: 0,
        }
    }
}

impl<'t, 'a, T: RowReadable> IntoIterator for &'t MetadataTable<'a, T> {
    type Item = Result<T>;
    type IntoIter = TableIterator<'t, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the rows of a [`MetadataTable`], in ascending row id order.
pub struct TableIterator<'t, 'a, T> {
    table: &'t MetadataTable<'a, T>,
    current_row: u32,
}

impl<T: RowReadable> Iterator for TableIterator<'_, '_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.table.row_count {
            return None;
        }

        let mut offset = self.current_row as usize * self.table.row_size as usize;
        self.current_row += 1;

        Some(T::row_read(
            self.table.data,
            &mut offset,
            self.current_row,
            &self.table.sizes,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.table.row_count - self.current_row) as usize;
        (remaining, Some(remaining))
    }
}

impl<T: RowReadable> ExactSizeIterator for TableIterator<'_, '_, T> {}
