use crate::metadata::tables::types::{CodedIndexType, TableId, TableInfo};

impl TableInfo {
    /// Size in bytes of one row of `table`, per the column layouts of ECMA-335 II.22 and
    /// the Portable PDB tables.
    ///
    /// The tables stream stores tables back to back without any per-table length, so the
    /// start of every table depends on the row sizes of all tables before it.
    #[must_use]
    #[rustfmt::skip]
    pub fn row_size(&self, table: TableId) -> u32 {
        let s = self.str_bytes();
        let g = self.guid_bytes();
        let b = self.blob_bytes();
        let t = |id: TableId| self.table_index_bytes(id);
        let c = |ci: CodedIndexType| self.coded_index_bytes(ci);

        let size = match table {
            TableId::Module => 2 + s + g + g + g,
            TableId::TypeRef => c(CodedIndexType::ResolutionScope) + s + s,
            TableId::TypeDef => {
                4 + s + s + c(CodedIndexType::TypeDefOrRef) + t(TableId::Field) + t(TableId::MethodDef)
            }
            TableId::FieldPtr => t(TableId::Field),
            TableId::Field => 2 + s + b,
            TableId::MethodPtr => t(TableId::MethodDef),
            TableId::MethodDef => 4 + 2 + 2 + s + b + t(TableId::Param),
            TableId::ParamPtr => t(TableId::Param),
            TableId::Param => 2 + 2 + s,
            TableId::InterfaceImpl => t(TableId::TypeDef) + c(CodedIndexType::TypeDefOrRef),
            TableId::MemberRef => c(CodedIndexType::MemberRefParent) + s + b,
            TableId::Constant => 1 + 1 + c(CodedIndexType::HasConstant) + b,
            TableId::CustomAttribute => {
                c(CodedIndexType::HasCustomAttribute) + c(CodedIndexType::CustomAttributeType) + b
            }
            TableId::FieldMarshal => c(CodedIndexType::HasFieldMarshal) + b,
            TableId::DeclSecurity => 2 + c(CodedIndexType::HasDeclSecurity) + b,
            TableId::ClassLayout => 2 + 4 + t(TableId::TypeDef),
            TableId::FieldLayout => 4 + t(TableId::Field),
            TableId::StandAloneSig => b,
            TableId::EventMap => t(TableId::TypeDef) + t(TableId::Event),
            TableId::EventPtr => t(TableId::Event),
            TableId::Event => 2 + s + c(CodedIndexType::TypeDefOrRef),
            TableId::PropertyMap => t(TableId::TypeDef) + t(TableId::Property),
            TableId::PropertyPtr => t(TableId::Property),
            TableId::Property => 2 + s + b,
            TableId::MethodSemantics => 2 + t(TableId::MethodDef) + c(CodedIndexType::HasSemantics),
            TableId::MethodImpl => {
                t(TableId::TypeDef) + c(CodedIndexType::MethodDefOrRef) + c(CodedIndexType::MethodDefOrRef)
            }
            TableId::ModuleRef => s,
            TableId::TypeSpec => b,
            TableId::ImplMap => 2 + c(CodedIndexType::MemberForwarded) + s + t(TableId::ModuleRef),
            TableId::FieldRVA => 4 + t(TableId::Field),
            TableId::EncLog => 4 + 4,
            TableId::EncMap => 4,
            TableId::Assembly => 4 + 2 + 2 + 2 + 2 + 4 + b + s + s,
            TableId::AssemblyProcessor => 4,
            TableId::AssemblyOS => 4 + 4 + 4,
            TableId::AssemblyRef => 2 + 2 + 2 + 2 + 4 + b + s + s + b,
            TableId::AssemblyRefProcessor => 4 + t(TableId::AssemblyRef),
            TableId::AssemblyRefOS => 4 + 4 + 4 + t(TableId::AssemblyRef),
            TableId::File => 4 + s + b,
            TableId::ExportedType => 4 + 4 + s + s + c(CodedIndexType::Implementation),
            TableId::ManifestResource => 4 + 4 + s + c(CodedIndexType::Implementation),
            TableId::NestedClass => t(TableId::TypeDef) + t(TableId::TypeDef),
            TableId::GenericParam => 2 + 2 + c(CodedIndexType::TypeOrMethodDef) + s,
            TableId::MethodSpec => c(CodedIndexType::MethodDefOrRef) + b,
            TableId::GenericParamConstraint => {
                t(TableId::GenericParam) + c(CodedIndexType::TypeDefOrRef)
            }
            TableId::Document => b + g + b + g,
            TableId::MethodDebugInformation => t(TableId::Document) + b,
            TableId::LocalScope => {
                t(TableId::MethodDef) + t(TableId::ImportScope) + t(TableId::LocalVariable)
                    + t(TableId::LocalConstant) + 4 + 4
            }
            TableId::LocalVariable => 2 + 2 + s,
            TableId::LocalConstant => s + b,
            TableId::ImportScope => t(TableId::ImportScope) + b,
            TableId::StateMachineMethod => t(TableId::MethodDef) + t(TableId::MethodDef),
            TableId::CustomDebugInformation => {
                c(CodedIndexType::HasCustomDebugInformation) + g + b
            }
        };

        u32::from(size)
    }
}
