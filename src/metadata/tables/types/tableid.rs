use strum::{EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// Identifiers of the metadata tables this crate knows the layout of.
///
/// The discriminant is the table number used by the `valid` bit vector of the tables
/// stream. Ids `0x00` - `0x2C` are defined by ECMA-335 II.22, ids `0x30` - `0x37` by the
/// Portable PDB format.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, FromRepr, IntoStaticStr)]
#[repr(u8)]
pub enum TableId {
    /// `Module` table (0x00) - the single row describing this module
    Module = 0x00,
    /// `TypeRef` table (0x01) - references to types defined elsewhere
    TypeRef = 0x01,
    /// `TypeDef` table (0x02) - types defined in this module
    TypeDef = 0x02,
    /// `FieldPtr` table (0x03) - indirection for unoptimized metadata
    FieldPtr = 0x03,
    /// `Field` table (0x04)
    Field = 0x04,
    /// `MethodPtr` table (0x05) - indirection for unoptimized metadata
    MethodPtr = 0x05,
    /// `MethodDef` table (0x06)
    MethodDef = 0x06,
    /// `ParamPtr` table (0x07) - indirection for unoptimized metadata
    ParamPtr = 0x07,
    /// `Param` table (0x08)
    Param = 0x08,
    /// `InterfaceImpl` table (0x09)
    InterfaceImpl = 0x09,
    /// `MemberRef` table (0x0A)
    MemberRef = 0x0A,
    /// `Constant` table (0x0B)
    Constant = 0x0B,
    /// `CustomAttribute` table (0x0C)
    CustomAttribute = 0x0C,
    /// `FieldMarshal` table (0x0D)
    FieldMarshal = 0x0D,
    /// `DeclSecurity` table (0x0E)
    DeclSecurity = 0x0E,
    /// `ClassLayout` table (0x0F)
    ClassLayout = 0x0F,
    /// `FieldLayout` table (0x10)
    FieldLayout = 0x10,
    /// `StandAloneSig` table (0x11)
    StandAloneSig = 0x11,
    /// `EventMap` table (0x12)
    EventMap = 0x12,
    /// `EventPtr` table (0x13) - indirection for unoptimized metadata
    EventPtr = 0x13,
    /// `Event` table (0x14)
    Event = 0x14,
    /// `PropertyMap` table (0x15)
    PropertyMap = 0x15,
    /// `PropertyPtr` table (0x16) - indirection for unoptimized metadata
    PropertyPtr = 0x16,
    /// `Property` table (0x17)
    Property = 0x17,
    /// `MethodSemantics` table (0x18)
    MethodSemantics = 0x18,
    /// `MethodImpl` table (0x19)
    MethodImpl = 0x19,
    /// `ModuleRef` table (0x1A)
    ModuleRef = 0x1A,
    /// `TypeSpec` table (0x1B)
    TypeSpec = 0x1B,
    /// `ImplMap` table (0x1C)
    ImplMap = 0x1C,
    /// `FieldRVA` table (0x1D)
    FieldRVA = 0x1D,
    /// `EncLog` table (0x1E) - edit-and-continue log
    EncLog = 0x1E,
    /// `EncMap` table (0x1F) - edit-and-continue mapping
    EncMap = 0x1F,
    /// `Assembly` table (0x20)
    Assembly = 0x20,
    /// `AssemblyProcessor` table (0x21) - unused by current runtimes
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` table (0x22) - unused by current runtimes
    AssemblyOS = 0x22,
    /// `AssemblyRef` table (0x23) - referenced assemblies
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` table (0x24) - unused by current runtimes
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` table (0x25) - unused by current runtimes
    AssemblyRefOS = 0x25,
    /// `File` table (0x26)
    File = 0x26,
    /// `ExportedType` table (0x27)
    ExportedType = 0x27,
    /// `ManifestResource` table (0x28)
    ManifestResource = 0x28,
    /// `NestedClass` table (0x29)
    NestedClass = 0x29,
    /// `GenericParam` table (0x2A)
    GenericParam = 0x2A,
    /// `MethodSpec` table (0x2B)
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table (0x2C)
    GenericParamConstraint = 0x2C,
    /// `Document` table (0x30) - Portable PDB
    Document = 0x30,
    /// `MethodDebugInformation` table (0x31) - Portable PDB
    MethodDebugInformation = 0x31,
    /// `LocalScope` table (0x32) - Portable PDB
    LocalScope = 0x32,
    /// `LocalVariable` table (0x33) - Portable PDB
    LocalVariable = 0x33,
    /// `LocalConstant` table (0x34) - Portable PDB
    LocalConstant = 0x34,
    /// `ImportScope` table (0x35) - Portable PDB
    ImportScope = 0x35,
    /// `StateMachineMethod` table (0x36) - Portable PDB
    StateMachineMethod = 0x36,
    /// `CustomDebugInformation` table (0x37) - Portable PDB
    CustomDebugInformation = 0x37,
}

impl TableId {
    /// The table name as used in ECMA-335, e.g. `"TypeRef"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The label fixtures use for references into this table.
    ///
    /// These are the handle kind names of the System.Reflection.Metadata reader. Tables
    /// without a handle kind of their own are labeled with their table name.
    #[must_use]
    pub fn kind_label(self) -> &'static str {
        match self {
            TableId::Module => "ModuleDefinition",
            TableId::TypeRef => "TypeReference",
            TableId::TypeDef => "TypeDefinition",
            TableId::Field => "FieldDefinition",
            TableId::MethodDef => "MethodDefinition",
            TableId::Param => "Parameter",
            TableId::InterfaceImpl => "InterfaceImplementation",
            TableId::MemberRef => "MemberReference",
            TableId::Constant => "Constant",
            TableId::CustomAttribute => "CustomAttribute",
            TableId::DeclSecurity => "DeclarativeSecurityAttribute",
            TableId::StandAloneSig => "StandaloneSignature",
            TableId::Event => "EventDefinition",
            TableId::Property => "PropertyDefinition",
            TableId::MethodImpl => "MethodImplementation",
            TableId::ModuleRef => "ModuleReference",
            TableId::TypeSpec => "TypeSpecification",
            TableId::Assembly => "AssemblyDefinition",
            TableId::AssemblyRef => "AssemblyReference",
            TableId::File => "AssemblyFile",
            TableId::ExportedType => "ExportedType",
            TableId::ManifestResource => "ManifestResource",
            TableId::GenericParam => "GenericParameter",
            TableId::MethodSpec => "MethodSpecification",
            TableId::GenericParamConstraint => "GenericParameterConstraint",
            TableId::Document => "Document",
            TableId::MethodDebugInformation => "MethodDebugInformation",
            TableId::LocalScope => "LocalScope",
            TableId::LocalVariable => "LocalVariable",
            TableId::LocalConstant => "LocalConstant",
            TableId::ImportScope => "ImportScope",
            TableId::CustomDebugInformation => "CustomDebugInformation",
            TableId::FieldPtr
            | TableId::MethodPtr
            | TableId::ParamPtr
            | TableId::FieldMarshal
            | TableId::ClassLayout
            | TableId::FieldLayout
            | TableId::EventMap
            | TableId::EventPtr
            | TableId::PropertyMap
            | TableId::PropertyPtr
            | TableId::MethodSemantics
            | TableId::ImplMap
            | TableId::FieldRVA
            | TableId::EncLog
            | TableId::EncMap
            | TableId::AssemblyProcessor
            | TableId::AssemblyOS
            | TableId::AssemblyRefProcessor
            | TableId::AssemblyRefOS
            | TableId::NestedClass
            | TableId::StateMachineMethod => self.name(),
        }
    }
}
