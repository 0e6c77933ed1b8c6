//! Builds minimal .NET PE images for the integration tests.
//!
//! The image is a PE32 DLL with a single `.text` section holding the CLI header followed
//! by the metadata. All heaps are small, so every index is 2 bytes wide.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

const FILE_ALIGNMENT: usize = 0x200;
const SECTION_ALIGNMENT: usize = 0x2000;
const TEXT_RVA: usize = 0x2000;
const CLI_HEADER_SIZE: usize = 72;

pub const MSCORLIB_TOKEN: [u8; 8] = [0xB7, 0x7A, 0x5C, 0x56, 0x19, 0x34, 0xE0, 0x89];

/// Coded `ResolutionScope` pointing at an `AssemblyRef` row
pub fn scope_assembly_ref(row: u32) -> u16 {
    ((row << 2) | 2) as u16
}

/// Coded `ResolutionScope` pointing at an enclosing `TypeRef` row
pub fn scope_type_ref(row: u32) -> u16 {
    ((row << 2) | 3) as u16
}

/// Coded `TypeDefOrRef` pointing at a `TypeRef` row
pub fn extends_type_ref(row: u32) -> u16 {
    ((row << 2) | 1) as u16
}

/// Coded `TypeDefOrRef` pointing at a `TypeDef` row
pub fn extends_type_def(row: u32) -> u16 {
    (row << 2) as u16
}

pub struct TypeRef {
    pub scope: u16,
    pub namespace: &'static str,
    pub name: &'static str,
}

pub struct TypeDef {
    pub flags: u32,
    pub namespace: &'static str,
    pub name: &'static str,
    pub extends: u16,
}

pub struct AssemblyRef {
    pub version: [u16; 4],
    pub flags: u32,
    pub public_key_or_token: Vec<u8>,
    pub name: &'static str,
    pub culture: &'static str,
}

pub struct ImageBuilder {
    pub tables_stream: &'static str,
    pub module_name: &'static str,
    pub mvid: Option<[u8; 16]>,
    pub type_refs: Vec<TypeRef>,
    pub type_defs: Vec<TypeDef>,
    pub assembly_refs: Vec<AssemblyRef>,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        ImageBuilder {
            tables_stream: "#~",
            module_name: "Sample.dll",
            mvid: None,
            type_refs: Vec::new(),
            type_defs: Vec::new(),
            assembly_refs: Vec::new(),
        }
    }
}

/// A module with the usual shape of a small class library
pub fn sample() -> ImageBuilder {
    ImageBuilder {
        mvid: Some([
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
            0x0F, 0x10,
        ]),
        type_refs: vec![
            TypeRef {
                scope: scope_assembly_ref(1),
                namespace: "System",
                name: "Object",
            },
            TypeRef {
                scope: scope_assembly_ref(1),
                namespace: "System.Runtime.CompilerServices",
                name: "CompilationRelaxationsAttribute",
            },
            TypeRef {
                scope: scope_type_ref(2),
                namespace: "",
                name: "Nested",
            },
        ],
        type_defs: vec![
            TypeDef {
                flags: 0,
                namespace: "",
                name: "<Module>",
                extends: 0,
            },
            TypeDef {
                flags: 0x0010_0001,
                namespace: "Sample",
                name: "Greeter",
                extends: extends_type_ref(1),
            },
        ],
        assembly_refs: vec![
            AssemblyRef {
                version: [4, 0, 0, 0],
                flags: 0,
                public_key_or_token: MSCORLIB_TOKEN.to_vec(),
                name: "mscorlib",
                culture: "",
            },
            AssemblyRef {
                version: [1, 2, 3, 4],
                flags: 0,
                public_key_or_token: Vec::new(),
                name: "Sample.Core",
                culture: "neutral",
            },
        ],
        ..ImageBuilder::default()
    }
}

#[derive(Default)]
struct Heaps {
    strings: Vec<u8>,
    guids: Vec<u8>,
    blobs: Vec<u8>,
}

impl Heaps {
    fn new() -> Self {
        Heaps {
            strings: vec![0],
            guids: Vec::new(),
            blobs: vec![0],
        }
    }

    fn string(&mut self, value: &str) -> u16 {
        if value.is_empty() {
            return 0;
        }
        let offset = self.strings.len();
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        offset as u16
    }

    fn guid(&mut self, value: Option<[u8; 16]>) -> u16 {
        let Some(value) = value else {
            return 0;
        };
        self.guids.extend_from_slice(&value);
        (self.guids.len() / 16) as u16
    }

    fn blob(&mut self, value: &[u8]) -> u16 {
        if value.is_empty() {
            return 0;
        }
        assert!(value.len() < 0x80);
        let offset = self.blobs.len();
        self.blobs.push(value.len() as u8);
        self.blobs.extend_from_slice(value);
        offset as u16
    }
}

fn u16le(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn u32le(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn pad4(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

fn align(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

fn put_u16(out: &mut [u8], offset: usize, value: u16) {
    out[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut [u8], offset: usize, value: u32) {
    out[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

impl ImageBuilder {
    fn tables(&self, heaps: &mut Heaps) -> Vec<u8> {
        let mut rows = Vec::new();
        let mut valid = 0_u64;
        let mut counts = Vec::new();

        // Module
        valid |= 1;
        counts.push(1_u32);
        u16le(&mut rows, 0);
        u16le(&mut rows, heaps.string(self.module_name));
        u16le(&mut rows, heaps.guid(self.mvid));
        u16le(&mut rows, 0);
        u16le(&mut rows, 0);

        if !self.type_refs.is_empty() {
            valid |= 1 << 0x01;
            counts.push(self.type_refs.len() as u32);
            for type_ref in &self.type_refs {
                u16le(&mut rows, type_ref.scope);
                u16le(&mut rows, heaps.string(type_ref.name));
                u16le(&mut rows, heaps.string(type_ref.namespace));
            }
        }

        if !self.type_defs.is_empty() {
            valid |= 1 << 0x02;
            counts.push(self.type_defs.len() as u32);
            for type_def in &self.type_defs {
                u32le(&mut rows, type_def.flags);
                u16le(&mut rows, heaps.string(type_def.name));
                u16le(&mut rows, heaps.string(type_def.namespace));
                u16le(&mut rows, type_def.extends);
                u16le(&mut rows, 1);
                u16le(&mut rows, 1);
            }
        }

        if !self.assembly_refs.is_empty() {
            valid |= 1 << 0x23;
            counts.push(self.assembly_refs.len() as u32);
            for assembly_ref in &self.assembly_refs {
                for part in assembly_ref.version {
                    u16le(&mut rows, part);
                }
                u32le(&mut rows, assembly_ref.flags);
                u16le(&mut rows, heaps.blob(&assembly_ref.public_key_or_token));
                u16le(&mut rows, heaps.string(assembly_ref.name));
                u16le(&mut rows, heaps.string(assembly_ref.culture));
                u16le(&mut rows, 0);
            }
        }

        let mut stream = Vec::new();
        u32le(&mut stream, 0);
        stream.extend_from_slice(&[2, 0, 0, 1]);
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&0_u64.to_le_bytes());
        for count in counts {
            u32le(&mut stream, count);
        }
        stream.extend_from_slice(&rows);
        pad4(&mut stream);
        stream
    }

    fn metadata(&self) -> Vec<u8> {
        let mut heaps = Heaps::new();
        let tables = self.tables(&mut heaps);

        let mut strings = heaps.strings;
        pad4(&mut strings);
        let mut blobs = heaps.blobs;
        pad4(&mut blobs);
        let user_strings = vec![0, 0, 0, 0];

        let streams: [(&str, &[u8]); 5] = [
            (self.tables_stream, &tables),
            ("#Strings", &strings),
            ("#US", &user_strings),
            ("#GUID", &heaps.guids),
            ("#Blob", &blobs),
        ];

        let version = b"v4.0.30319\0\0";
        let header_size = 16
            + version.len()
            + 4
            + streams
                .iter()
                .map(|(name, _)| 8 + align(name.len() + 1, 4))
                .sum::<usize>();

        let mut root = Vec::new();
        u32le(&mut root, 0x424A_5342);
        u16le(&mut root, 1);
        u16le(&mut root, 1);
        u32le(&mut root, 0);
        u32le(&mut root, version.len() as u32);
        root.extend_from_slice(version);
        u16le(&mut root, 0);
        u16le(&mut root, streams.len() as u16);

        let mut offset = header_size;
        for (name, data) in &streams {
            u32le(&mut root, offset as u32);
            u32le(&mut root, data.len() as u32);
            root.extend_from_slice(name.as_bytes());
            root.push(0);
            pad4(&mut root);
            offset += data.len();
        }
        assert_eq!(root.len(), header_size);

        for (_, data) in &streams {
            root.extend_from_slice(data);
        }
        root
    }

    /// The complete PE image
    pub fn build(&self) -> Vec<u8> {
        let metadata = self.metadata();

        let mut text = Vec::new();
        u32le(&mut text, CLI_HEADER_SIZE as u32);
        u16le(&mut text, 2);
        u16le(&mut text, 5);
        u32le(&mut text, (TEXT_RVA + CLI_HEADER_SIZE) as u32);
        u32le(&mut text, metadata.len() as u32);
        u32le(&mut text, 1);
        text.resize(CLI_HEADER_SIZE, 0);
        text.extend_from_slice(&metadata);

        let virtual_size = text.len();
        let raw_size = align(virtual_size, FILE_ALIGNMENT);
        text.resize(raw_size, 0);

        let mut image = vec![0_u8; FILE_ALIGNMENT];

        // DOS header
        image[0] = b'M';
        image[1] = b'Z';
        put_u32(&mut image, 0x3C, 0x80);

        // PE signature and COFF header
        image[0x80..0x84].copy_from_slice(b"PE\0\0");
        put_u16(&mut image, 0x84, 0x014C);
        put_u16(&mut image, 0x86, 1);
        put_u16(&mut image, 0x94, 0xE0);
        put_u16(&mut image, 0x96, 0x2102);

        // PE32 optional header
        let opt = 0x98;
        put_u16(&mut image, opt, 0x010B);
        image[opt + 2] = 8;
        put_u32(&mut image, opt + 4, raw_size as u32);
        put_u32(&mut image, opt + 20, TEXT_RVA as u32);
        put_u32(&mut image, opt + 28, 0x0040_0000);
        put_u32(&mut image, opt + 32, SECTION_ALIGNMENT as u32);
        put_u32(&mut image, opt + 36, FILE_ALIGNMENT as u32);
        put_u16(&mut image, opt + 40, 4);
        put_u16(&mut image, opt + 48, 4);
        put_u32(
            &mut image,
            opt + 56,
            (TEXT_RVA + align(virtual_size, SECTION_ALIGNMENT)) as u32,
        );
        put_u32(&mut image, opt + 60, FILE_ALIGNMENT as u32);
        put_u16(&mut image, opt + 68, 3);
        put_u16(&mut image, opt + 70, 0x8540);
        put_u32(&mut image, opt + 72, 0x0010_0000);
        put_u32(&mut image, opt + 76, 0x1000);
        put_u32(&mut image, opt + 80, 0x0010_0000);
        put_u32(&mut image, opt + 84, 0x1000);
        put_u32(&mut image, opt + 92, 16);

        // CLR runtime header directory, entry 14
        let clr_dir = opt + 96 + 14 * 8;
        put_u32(&mut image, clr_dir, TEXT_RVA as u32);
        put_u32(&mut image, clr_dir + 4, CLI_HEADER_SIZE as u32);

        // .text section header
        let section = opt + 0xE0;
        image[section..section + 5].copy_from_slice(b".text");
        put_u32(&mut image, section + 8, virtual_size as u32);
        put_u32(&mut image, section + 12, TEXT_RVA as u32);
        put_u32(&mut image, section + 16, raw_size as u32);
        put_u32(&mut image, section + 20, FILE_ALIGNMENT as u32);
        put_u32(&mut image, section + 36, 0x6000_0020);

        image.extend_from_slice(&text);
        image
    }

    /// Write the image as `dir/name` and return its path
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}
