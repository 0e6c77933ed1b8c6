mod common;

use std::{fs, path::Path};

use mdfixture::{
    metadata::{
        tables::{AssemblyRefRaw, ModuleRaw, TableId, TypeDefRaw, TypeRefRaw},
        view::AssemblyView,
    },
    write_metadata, Error, HeapValues, OutputFormat, WriterConfig,
};
use toml_edit::{ArrayOfTables, DocumentMut};

use common::{sample, ImageBuilder, MSCORLIB_TOKEN};

fn config(dir: &Path) -> WriterConfig {
    WriterConfig {
        output_dir: dir.to_path_buf(),
        ..WriterConfig::default()
    }
}

fn resolved(dir: &Path) -> WriterConfig {
    WriterConfig {
        heap_values: HeapValues::Resolved,
        ..config(dir)
    }
}

fn read_toml(path: &Path) -> DocumentMut {
    fs::read_to_string(path).unwrap().parse().unwrap()
}

fn section<'d>(document: &'d DocumentMut, name: &str) -> &'d ArrayOfTables {
    document[name].as_array_of_tables().unwrap()
}

fn string<'d>(table: &'d toml_edit::Table, key: &str) -> &'d str {
    table[key].as_str().unwrap()
}

fn integer(table: &toml_edit::Table, key: &str) -> i64 {
    table[key].as_integer().unwrap()
}

fn reference(table: &toml_edit::Table, key: &str) -> (String, i64) {
    let inline = table[key].as_inline_table().unwrap();
    (
        inline.get("kind").unwrap().as_str().unwrap().to_string(),
        inline.get("row_id").unwrap().as_integer().unwrap(),
    )
}

#[test]
fn view_reads_tables() {
    let view = AssemblyView::from_mem(sample().build()).unwrap();

    assert_eq!(view.cor20header().major_runtime_version, 2);
    assert_eq!(view.metadata_root().version, "v4.0.30319");
    assert_eq!(view.streams().len(), 5);
    assert!(view.guids().is_some());
    assert!(view.blobs().is_some());

    let tables = view.tables();
    assert_eq!(tables.table_count(), 4);
    assert_eq!(tables.row_count(TableId::Module), 1);
    assert_eq!(tables.row_count(TableId::TypeRef), 3);
    assert_eq!(tables.row_count(TableId::TypeDef), 2);
    assert_eq!(tables.row_count(TableId::AssemblyRef), 2);
    assert!(!tables.has_table(TableId::Field));

    let module = tables.table::<ModuleRaw>().unwrap().unwrap();
    let row = module.get(1).unwrap().unwrap();
    assert_eq!(view.strings().get(row.name as usize).unwrap(), "Sample.dll");
    assert_eq!(row.mvid, 1);
    assert!(module.get(2).unwrap().is_none());

    let type_refs = tables.table::<TypeRefRaw>().unwrap().unwrap();
    let names: Vec<&str> = type_refs
        .iter()
        .map(|row| view.strings().get(row.unwrap().type_name as usize).unwrap())
        .collect();
    assert_eq!(
        names,
        ["Object", "CompilationRelaxationsAttribute", "Nested"]
    );
}

#[test]
fn module_section() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample().write(dir.path(), "Sample.dll");
    let out = tempfile::tempdir().unwrap();

    let path = write_metadata(&input, &config(out.path())).unwrap();
    assert_eq!(path, out.path().join("Sample.toml"));

    let document = read_toml(&path);
    let modules = section(&document, "module");
    assert_eq!(modules.len(), 1);

    let view = AssemblyView::from_file(&input).unwrap();
    let row = view
        .tables()
        .table::<ModuleRaw>()
        .unwrap()
        .unwrap()
        .get(1)
        .unwrap()
        .unwrap();

    let module = modules.get(0).unwrap();
    let keys: Vec<&str> = module.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, ["name", "mvid", "enc_id", "enc_base_id"]);
    assert_eq!(integer(module, "name"), i64::from(row.name));
    assert_eq!(integer(module, "mvid"), 1);
    assert_eq!(integer(module, "enc_id"), 0);
    assert_eq!(integer(module, "enc_base_id"), 0);
}

#[test]
fn nil_mvid() {
    let dir = tempfile::tempdir().unwrap();
    let input = ImageBuilder::default().write(dir.path(), "Empty.dll");

    let path = write_metadata(&input, &config(dir.path())).unwrap();
    let document = read_toml(&path);
    let module = section(&document, "module").get(0).unwrap();
    assert_eq!(integer(module, "mvid"), 0);
    assert_ne!(integer(module, "name"), 0);

    let path = write_metadata(&input, &resolved(dir.path())).unwrap();
    let document = read_toml(&path);
    let module = section(&document, "module").get(0).unwrap();
    assert_eq!(integer(module, "mvid"), 0);
    assert_eq!(string(module, "name"), "Sample.dll");
}

#[test]
fn resolved_mvid() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample().write(dir.path(), "Sample.dll");

    let path = write_metadata(&input, &resolved(dir.path())).unwrap();
    let document = read_toml(&path);
    let module = section(&document, "module").get(0).unwrap();
    assert_eq!(
        string(module, "mvid"),
        "04030201-0605-0807-090a-0b0c0d0e0f10"
    );
    assert_eq!(integer(module, "enc_id"), 0);
}

#[test]
fn rows_in_table_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample().write(dir.path(), "Sample.dll");

    let path = write_metadata(&input, &resolved(dir.path())).unwrap();
    let document = read_toml(&path);

    let type_refs = section(&document, "type_ref");
    assert_eq!(type_refs.len(), 3);
    let names: Vec<&str> = type_refs.iter().map(|row| string(row, "name")).collect();
    assert_eq!(
        names,
        ["Object", "CompilationRelaxationsAttribute", "Nested"]
    );
    let first = type_refs.get(0).unwrap();
    assert_eq!(string(first, "namespace"), "System");
    assert_eq!(
        reference(first, "resolution_scope"),
        ("AssemblyReference".to_string(), 1)
    );
    assert_eq!(
        reference(type_refs.get(2).unwrap(), "resolution_scope"),
        ("TypeReference".to_string(), 2)
    );

    let type_defs = section(&document, "type_def");
    assert_eq!(type_defs.len(), 2);
    let module_type = type_defs.get(0).unwrap();
    assert_eq!(string(module_type, "name"), "<Module>");
    assert_eq!(string(module_type, "namespace"), "");
    assert_eq!(
        reference(module_type, "extends"),
        ("TypeDefinition".to_string(), 0)
    );
    let greeter = type_defs.get(1).unwrap();
    assert_eq!(integer(greeter, "flags"), 0x0010_0001);
    assert_eq!(string(greeter, "name"), "Greeter");
    assert_eq!(
        reference(greeter, "extends"),
        ("TypeReference".to_string(), 1)
    );
}

#[test]
fn matches_metadata_reader() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample().write(dir.path(), "Sample.dll");

    let path = write_metadata(&input, &config(dir.path())).unwrap();
    let document = read_toml(&path);
    let view = AssemblyView::from_file(&input).unwrap();

    let type_refs = view.tables().table::<TypeRefRaw>().unwrap().unwrap();
    let written = section(&document, "type_ref");
    assert_eq!(written.len(), type_refs.row_count() as usize);
    for (row, record) in type_refs.iter().zip(written.iter()) {
        let row = row.unwrap();
        assert_eq!(integer(record, "name"), i64::from(row.type_name));
        assert_eq!(integer(record, "namespace"), i64::from(row.type_namespace));
        assert_eq!(
            reference(record, "resolution_scope"),
            (
                row.resolution_scope.tag.kind_label().to_string(),
                i64::from(row.resolution_scope.row)
            )
        );
    }

    let type_defs = view.tables().table::<TypeDefRaw>().unwrap().unwrap();
    let written = section(&document, "type_def");
    assert_eq!(written.len(), type_defs.row_count() as usize);
    for (row, record) in type_defs.iter().zip(written.iter()) {
        let row = row.unwrap();
        assert_eq!(integer(record, "flags"), i64::from(row.flags));
        assert_eq!(integer(record, "name"), i64::from(row.type_name));
        assert_eq!(integer(record, "namespace"), i64::from(row.type_namespace));
        assert_eq!(
            reference(record, "extends"),
            (
                row.extends.tag.kind_label().to_string(),
                i64::from(row.extends.row)
            )
        );
        assert_eq!(record.len(), 4);
    }

    let assembly_refs = view.tables().table::<AssemblyRefRaw>().unwrap().unwrap();
    let written = section(&document, "assembly_ref");
    assert_eq!(written.len(), assembly_refs.row_count() as usize);
    for (row, record) in assembly_refs.iter().zip(written.iter()) {
        let row = row.unwrap();
        assert_eq!(integer(record, "major_version"), i64::from(row.major_version));
        assert_eq!(integer(record, "minor_version"), i64::from(row.minor_version));
        assert_eq!(integer(record, "build_number"), i64::from(row.build_number));
        assert_eq!(
            integer(record, "revision_number"),
            i64::from(row.revision_number)
        );
        assert_eq!(integer(record, "flags"), i64::from(row.flags));
        assert_eq!(
            integer(record, "public_key_or_token"),
            i64::from(row.public_key_or_token)
        );
        assert_eq!(integer(record, "name"), i64::from(row.name));
        assert_eq!(integer(record, "culture"), i64::from(row.culture));
        assert_eq!(integer(record, "hash_value"), i64::from(row.hash_value));
        assert_eq!(record.len(), 9);
    }
}

#[test]
fn dotted_names_keep_their_stem() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = sample().write(dir.path(), "System.Runtime.dll");
    let linq = ImageBuilder::default().write(dir.path(), "System.Linq.dll");
    let out = tempfile::tempdir().unwrap();

    let runtime = write_metadata(&runtime, &config(out.path())).unwrap();
    let linq = write_metadata(&linq, &config(out.path())).unwrap();

    assert_eq!(runtime, out.path().join("System.Runtime.toml"));
    assert_eq!(linq, out.path().join("System.Linq.toml"));
    assert!(!out.path().join("System.toml").exists());

    assert_eq!(section(&read_toml(&runtime), "type_ref").len(), 3);
    assert!(read_toml(&linq)["type_ref"].as_array().unwrap().is_empty());
}

#[test]
fn assembly_refs() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample().write(dir.path(), "Sample.dll");

    let path = write_metadata(&input, &resolved(dir.path())).unwrap();
    let document = read_toml(&path);
    let assembly_refs = section(&document, "assembly_ref");
    assert_eq!(assembly_refs.len(), 2);

    let mscorlib = assembly_refs.get(0).unwrap();
    let keys: Vec<&str> = mscorlib.iter().map(|(key, _)| key).collect();
    assert_eq!(
        keys,
        [
            "major_version",
            "minor_version",
            "build_number",
            "revision_number",
            "flags",
            "public_key_or_token",
            "name",
            "culture",
            "hash_value"
        ]
    );
    assert_eq!(integer(mscorlib, "major_version"), 4);
    assert_eq!(
        string(mscorlib, "public_key_or_token"),
        hex::encode(MSCORLIB_TOKEN)
    );
    assert_eq!(string(mscorlib, "name"), "mscorlib");
    assert_eq!(string(mscorlib, "culture"), "");
    assert_eq!(string(mscorlib, "hash_value"), "");

    let core = assembly_refs.get(1).unwrap();
    assert_eq!(integer(core, "revision_number"), 4);
    assert_eq!(string(core, "public_key_or_token"), "");
    assert_eq!(string(core, "culture"), "neutral");
}

#[test]
fn assembly_refs_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample().write(dir.path(), "Sample.dll");

    let config = WriterConfig {
        assembly_refs: false,
        ..config(dir.path())
    };
    let path = write_metadata(&input, &config).unwrap();
    let document = read_toml(&path);
    assert!(document.get("assembly_ref").is_none());
    assert!(document.get("type_def").is_some());
}

#[test]
fn absent_tables_are_empty_sections() {
    let dir = tempfile::tempdir().unwrap();
    let input = ImageBuilder::default().write(dir.path(), "Empty.dll");

    let path = write_metadata(&input, &config(dir.path())).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("type_ref = []"));
    assert!(text.contains("type_def = []"));
    assert!(text.contains("assembly_ref = []"));

    let document: DocumentMut = text.parse().unwrap();
    assert!(document["type_ref"].as_array().unwrap().is_empty());
    assert_eq!(section(&document, "module").len(), 1);
}

#[test]
fn deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample().write(dir.path(), "Sample.dll");
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();

    let first = write_metadata(&input, &config(first_dir.path())).unwrap();
    let second = write_metadata(&input, &config(second_dir.path())).unwrap();
    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn json_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample().write(dir.path(), "Sample.dll");

    let config = WriterConfig {
        format: OutputFormat::Json,
        ..resolved(dir.path())
    };
    let path = write_metadata(&input, &config).unwrap();
    assert_eq!(path, dir.path().join("Sample.json"));

    let text = fs::read_to_string(&path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&String> = document.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["module", "type_ref", "type_def", "assembly_ref"]);
    assert_eq!(document["module"][0]["name"], "Sample.dll");
    assert_eq!(document["type_ref"].as_array().unwrap().len(), 3);
    assert_eq!(
        document["type_def"][1]["extends"],
        serde_json::json!({ "kind": "TypeReference", "row_id": 1 })
    );
}

#[test]
fn uncompressed_tables_stream() {
    let dir = tempfile::tempdir().unwrap();
    let builder = ImageBuilder {
        tables_stream: "#-",
        ..sample()
    };
    let input = builder.write(dir.path(), "Sample.dll");

    let path = write_metadata(&input, &resolved(dir.path())).unwrap();
    let document = read_toml(&path);
    assert_eq!(section(&document, "type_def").len(), 2);
}

#[test]
fn missing_tables_stream() {
    let builder = ImageBuilder {
        tables_stream: "#Other",
        ..sample()
    };
    assert!(matches!(
        AssemblyView::from_mem(builder.build()),
        Err(Error::NotSupported)
    ));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = write_metadata(&dir.path().join("missing.dll"), &config(dir.path()));
    assert!(matches!(result, Err(Error::FileError(_))));
    assert!(!dir.path().join("missing.toml").exists());
}

#[test]
fn not_a_pe_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.dll");
    fs::write(&input, b"this is not a portable executable image").unwrap();

    let result = write_metadata(&input, &config(dir.path()));
    assert!(matches!(result, Err(Error::GoblinErr(_))));
    assert!(!dir.path().join("notes.toml").exists());
}

#[test]
fn truncated_metadata() {
    let mut image = sample().build();
    // keeps the PE headers and the CLI header, cuts into the metadata
    image.truncate(0x200 + 0x80);

    assert!(AssemblyView::from_mem(image).is_err());
}
