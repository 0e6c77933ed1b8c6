//! Read-only view of the ECMA-335 metadata of a loaded binary.
//!
//! [`AssemblyView`] ties the parsed headers, heaps and tables to the [`File`] they borrow
//! from. Nothing is resolved eagerly; rows are decoded when a caller iterates a table.

use ouroboros::self_referencing;
use std::{path::Path, sync::Arc};

use log::debug;

use crate::{
    file::File,
    metadata::{
        cor20header::{Cor20Header, COR20_HEADER_SIZE},
        root::Root,
        streams::{Blob, Guid, StreamHeader, Strings, TablesHeader},
    },
    Error::{NotSupported, OutOfBounds},
    Result,
};

/// The parsed metadata, borrowing from the bytes of a [`File`].
pub struct AssemblyViewData<'a> {
    /// The CLI header
    pub cor20header: Cor20Header,
    /// The metadata root
    pub metadata_root: Root,
    /// The `#~` or `#-` tables stream
    pub metadata_tables: TablesHeader<'a>,
    /// The `#Strings` heap
    pub strings: Strings<'a>,
    /// The `#GUID` heap, if present
    pub guids: Option<Guid<'a>>,
    /// The `#Blob` heap, if present
    pub blobs: Option<Blob<'a>>,
}

impl<'a> AssemblyViewData<'a> {
    /// Locate and parse the metadata of `file`.
    ///
    /// The first stream of each name is used, later duplicates and unknown names are
    /// ignored.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the tables stream or the `#Strings` heap
    /// is missing, and the parse errors of the individual structures otherwise.
    pub fn from_file(file: &'a File) -> Result<Self> {
        let (clr_rva, _clr_size) = file.clr()?;
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20header = Cor20Header::read(file.data_slice(clr_offset, COR20_HEADER_SIZE)?)?;

        let metadata_offset = file.rva_to_offset(cor20header.meta_data_rva as usize)?;
        let metadata_slice =
            file.data_slice(metadata_offset, cor20header.meta_data_size as usize)?;
        let metadata_root = Root::read(metadata_slice)?;

        let mut tables_data = None;
        let mut strings_data = None;
        let mut guid_data = None;
        let mut blob_data = None;
        for stream in &metadata_root.stream_headers {
            let start = stream.offset as usize;
            let stream_data = metadata_slice
                .get(start..start + stream.size as usize)
                .ok_or(OutOfBounds)?;

            let slot = match stream.name.as_str() {
                "#~" | "#-" => &mut tables_data,
                "#Strings" => &mut strings_data,
                "#GUID" => &mut guid_data,
                "#Blob" => &mut blob_data,
                _ => {
                    debug!("ignoring stream {}", stream.name);
                    continue;
                }
            };

            if slot.is_none() {
                *slot = Some(stream_data);
            } else {
                debug!("ignoring duplicate stream {}", stream.name);
            }
        }

        let (Some(tables_data), Some(strings_data)) = (tables_data, strings_data) else {
            return Err(NotSupported);
        };

        let metadata_tables = TablesHeader::from(tables_data)?;
        debug!(
            "metadata {} with {} streams and {} tables",
            metadata_root.version,
            metadata_root.stream_headers.len(),
            metadata_tables.table_count()
        );

        Ok(AssemblyViewData {
            cor20header,
            metadata_root,
            metadata_tables,
            strings: Strings::from(strings_data)?,
            guids: guid_data.map(Guid::from),
            blobs: blob_data.map(Blob::from).transpose()?,
        })
    }
}

#[self_referencing]
/// A loaded binary together with its parsed metadata.
///
/// # Examples
///
/// ```rust,no_run
/// use mdfixture::metadata::{tables::TypeDefRaw, view::AssemblyView};
/// use std::path::Path;
///
/// let view = AssemblyView::from_file(Path::new("tests/samples/Sample.dll"))?;
/// if let Some(types) = view.tables().table::<TypeDefRaw>()? {
///     for row in types.iter() {
///         let row = row?;
///         println!("{}", view.strings().get(row.type_name as usize)?);
///     }
/// }
/// # Ok::<(), mdfixture::Error>(())
/// ```
pub struct AssemblyView {
    file: Arc<File>,
    #[borrows(file)]
    #[covariant]
    data: AssemblyViewData<'this>,
}

impl AssemblyView {
    /// Open a binary from disk and parse its metadata.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a PE image with a CLR header, or
    /// carries malformed metadata.
    pub fn from_file(file: &Path) -> Result<Self> {
        let input = Arc::new(File::from_file(file)?);
        Self::load(input)
    }

    /// Parse the metadata of a binary held in memory.
    ///
    /// # Errors
    /// Same as [`AssemblyView::from_file`], minus the filesystem errors.
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        let input = Arc::new(File::from_mem(data)?);
        Self::load(input)
    }

    fn load(file: Arc<File>) -> Result<Self> {
        AssemblyView::try_new(file, |file| AssemblyViewData::from_file(file))
    }

    /// The CLI header
    #[must_use]
    pub fn cor20header(&self) -> &Cor20Header {
        &self.borrow_data().cor20header
    }

    /// The metadata root
    #[must_use]
    pub fn metadata_root(&self) -> &Root {
        &self.borrow_data().metadata_root
    }

    /// The stream headers of the metadata root
    #[must_use]
    pub fn streams(&self) -> &[StreamHeader] {
        &self.borrow_data().metadata_root.stream_headers
    }

    /// The tables stream
    #[must_use]
    pub fn tables(&self) -> &TablesHeader<'_> {
        &self.borrow_data().metadata_tables
    }

    /// The `#Strings` heap
    #[must_use]
    pub fn strings(&self) -> &Strings<'_> {
        &self.borrow_data().strings
    }

    /// The `#GUID` heap
    #[must_use]
    pub fn guids(&self) -> Option<&Guid<'_>> {
        self.borrow_data().guids.as_ref()
    }

    /// The `#Blob` heap
    #[must_use]
    pub fn blobs(&self) -> Option<&Blob<'_>> {
        self.borrow_data().blobs.as_ref()
    }

    /// The underlying file
    #[must_use]
    pub fn file(&self) -> &Arc<File> {
        self.borrow_file()
    }
}
