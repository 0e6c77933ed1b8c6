//! Field extractors, one per record kind.
//!
//! Each extractor reads one metadata table of an [`AssemblyView`] and projects a fixed set
//! of columns into [`Table`] records, in row order. Coded indexes are emitted as
//! `{ kind, row_id }` and never followed. A table the binary does not carry yields no
//! records.

use crate::{
    fixture::{HeapValues, Node, Table},
    metadata::{
        tables::{AssemblyRefRaw, CodedIndex, ModuleRaw, RowReadable, TypeDefRaw, TypeRefRaw},
        view::AssemblyView,
    },
    Result,
};

/// Section name of the module record
pub const MODULE: &str = "module";
/// Section name of the type reference records
pub const TYPE_REF: &str = "type_ref";
/// Section name of the type definition records
pub const TYPE_DEF: &str = "type_def";
/// Section name of the assembly reference records
pub const ASSEMBLY_REF: &str = "assembly_ref";

/// Turns heap indexes into record values according to the [`HeapValues`] mode
struct Heaps<'v> {
    view: &'v AssemblyView,
    mode: HeapValues,
}

impl<'v> Heaps<'v> {
    fn string(&self, index: u32) -> Result<Node> {
        match self.mode {
            HeapValues::Index => Ok(index.into()),
            HeapValues::Resolved => Ok(self.view.strings().get(index as usize)?.into()),
        }
    }

    fn guid(&self, index: u32) -> Result<Node> {
        if self.mode == HeapValues::Index || index == 0 {
            return Ok(index.into());
        }

        let Some(guids) = self.view.guids() else {
            return Err(malformed_error!("GUID index {} without a #GUID heap", index));
        };
        Ok(guids.get(index as usize)?.to_string().into())
    }

    fn blob(&self, index: u32) -> Result<Node> {
        if self.mode == HeapValues::Index {
            return Ok(index.into());
        }

        match self.view.blobs() {
            Some(blobs) => Ok(hex::encode(blobs.get(index as usize)?).into()),
            None if index == 0 => Ok(String::new().into()),
            None => Err(malformed_error!("Blob index {} without a #Blob heap", index)),
        }
    }
}

/// The `{ kind, row_id }` record of a coded index
#[must_use]
pub fn reference(index: &CodedIndex) -> Node {
    let mut table = Table::new();
    table.insert("kind".to_string(), index.tag.kind_label().into());
    table.insert("row_id".to_string(), index.row.into());
    Node::Table(table)
}

fn field(table: &mut Table, name: &str, value: Node) {
    table.insert(name.to_string(), value);
}

fn rows<T: RowReadable>(view: &AssemblyView) -> Result<Vec<T>> {
    match view.tables().table::<T>()? {
        Some(table) => table.iter().collect(),
        None => Ok(Vec::new()),
    }
}

/// Project the first `Module` row into `name`, `mvid`, `enc_id` and `enc_base_id`.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the `Module` table is missing or empty, and heap
/// errors in [`HeapValues::Resolved`] mode.
pub fn module(view: &AssemblyView, heaps: HeapValues) -> Result<Table> {
    let heaps = Heaps { view, mode: heaps };

    let row = match view.tables().table::<ModuleRaw>()? {
        Some(table) => table.get(1)?,
        None => None,
    };
    let Some(row) = row else {
        return Err(malformed_error!("Module table is empty"));
    };

    let mut record = Table::new();
    field(&mut record, "name", heaps.string(row.name)?);
    field(&mut record, "mvid", heaps.guid(row.mvid)?);
    field(&mut record, "enc_id", heaps.guid(row.encid)?);
    field(&mut record, "enc_base_id", heaps.guid(row.encbaseid)?);
    Ok(record)
}

/// Project every `TypeRef` row into `name`, `namespace` and `resolution_scope`.
///
/// # Errors
/// Returns row decoding errors, and heap errors in [`HeapValues::Resolved`] mode.
pub fn type_refs(view: &AssemblyView, heaps: HeapValues) -> Result<Vec<Table>> {
    let heaps = Heaps { view, mode: heaps };

    rows::<TypeRefRaw>(view)?
        .into_iter()
        .map(|row| {
            let mut record = Table::new();
            field(&mut record, "name", heaps.string(row.type_name)?);
            field(&mut record, "namespace", heaps.string(row.type_namespace)?);
            field(
                &mut record,
                "resolution_scope",
                reference(&row.resolution_scope),
            );
            Ok(record)
        })
        .collect()
}

/// Project every `TypeDef` row into `flags`, `name`, `namespace` and `extends`.
///
/// # Errors
/// Returns row decoding errors, and heap errors in [`HeapValues::Resolved`] mode.
pub fn type_defs(view: &AssemblyView, heaps: HeapValues) -> Result<Vec<Table>> {
    let heaps = Heaps { view, mode: heaps };

    rows::<TypeDefRaw>(view)?
        .into_iter()
        .map(|row| {
            let mut record = Table::new();
            field(&mut record, "flags", row.flags.into());
            field(&mut record, "name", heaps.string(row.type_name)?);
            field(&mut record, "namespace", heaps.string(row.type_namespace)?);
            field(&mut record, "extends", reference(&row.extends));
            Ok(record)
        })
        .collect()
}

/// Project every `AssemblyRef` row: version, flags, key, name, culture and hash.
///
/// # Errors
/// Returns row decoding errors, and heap errors in [`HeapValues::Resolved`] mode.
pub fn assembly_refs(view: &AssemblyView, heaps: HeapValues) -> Result<Vec<Table>> {
    let heaps = Heaps { view, mode: heaps };

    rows::<AssemblyRefRaw>(view)?
        .into_iter()
        .map(|row| {
            let mut record = Table::new();
            field(&mut record, "major_version", row.major_version.into());
            field(&mut record, "minor_version", row.minor_version.into());
            field(&mut record, "build_number", row.build_number.into());
            field(&mut record, "revision_number", row.revision_number.into());
            field(&mut record, "flags", row.flags.into());
            field(
                &mut record,
                "public_key_or_token",
                heaps.blob(row.public_key_or_token)?,
            );
            field(&mut record, "name", heaps.string(row.name)?);
            field(&mut record, "culture", heaps.string(row.culture)?);
            field(&mut record, "hash_value", heaps.blob(row.hash_value)?);
            Ok(record)
        })
        .collect()
}
