use toml_edit::{Array, ArrayOfTables, DocumentMut, InlineTable, Item, Value};

use crate::{
    fixture::{Document, Node, Table},
    Result,
};

/// The text format a fixture document is rendered in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// TOML, sections as arrays of tables
    #[default]
    Toml,
    /// Pretty-printed JSON object of arrays
    Json,
}

impl OutputFormat {
    /// File extension of the rendered document
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Toml => "toml",
            OutputFormat::Json => "json",
        }
    }

    /// Render `document`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Serialize`] if the document cannot be rendered
    pub fn render(self, document: &Document) -> Result<String> {
        match self {
            OutputFormat::Toml => Ok(render_toml(document)),
            OutputFormat::Json => {
                let mut text = serde_json::to_string_pretty(document)?;
                text.push('\n');
                Ok(text)
            }
        }
    }
}

// Empty sections have no `[[name]]` header to carry them, they become `name = []`.
fn render_toml(document: &Document) -> String {
    let mut output = DocumentMut::new();

    for (name, records) in document.sections() {
        if records.is_empty() {
            output.insert(name, Item::Value(Value::Array(Array::new())));
            continue;
        }

        let mut array = ArrayOfTables::new();
        for record in records {
            array.push(toml_table(record));
        }
        output.insert(name, Item::ArrayOfTables(array));
    }

    output.to_string()
}

fn toml_table(record: &Table) -> toml_edit::Table {
    let mut table = toml_edit::Table::new();
    for (key, node) in record {
        table.insert(key, Item::Value(toml_value(node)));
    }
    table
}

fn toml_value(node: &Node) -> Value {
    match node {
        Node::Integer(value) => Value::from(*value),
        Node::String(value) => Value::from(value.as_str()),
        Node::Array(items) => Value::Array(items.iter().map(toml_value).collect()),
        Node::Table(fields) => {
            let mut inline = InlineTable::new();
            for (key, node) in fields {
                inline.insert(key.as_str(), toml_value(node));
            }
            Value::InlineTable(inline)
        }
    }
}
