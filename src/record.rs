use markdown::mdast::Node;
use markdown::Options;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::{value_kind, Record};

const YAML_FENCE: &str = "---";
const TOML_FENCE: &str = "+++";

/// Metadata block found at the head of a content entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataBlock {
    Yaml(String),
    Toml(String),
}

/// Pulls the frontmatter block out of a markdown entry.
pub fn extract_frontmatter(entry: &str) -> Result<Option<MetadataBlock>> {
    let mut options = Options::gfm();
    options.parse.constructs.frontmatter = true;

    let ast = markdown::to_mdast(entry, &options.parse)
        .map_err(|message| Error::Markdown(message.to_string()))?;

    let block = match &ast {
        Node::Root(root) => match root.children.first() {
            Some(Node::Yaml(yaml)) => Some(MetadataBlock::Yaml(yaml.value.clone())),
            Some(Node::Toml(toml)) => Some(MetadataBlock::Toml(toml.value.clone())),
            _ => None,
        },
        _ => None,
    };
    Ok(block)
}

/// Decodes a metadata block into an untyped record.
///
/// Accepts a whole markdown entry with a `---` (YAML) or `+++` (TOML)
/// frontmatter fence, or a bare YAML/JSON document. An entry without any
/// metadata decodes to an empty record.
pub fn decode_record(text: &str) -> Result<Record> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.starts_with(YAML_FENCE) || text.starts_with(TOML_FENCE) {
        match extract_frontmatter(text)? {
            Some(MetadataBlock::Yaml(yaml)) => return decode_yaml(&yaml),
            Some(MetadataBlock::Toml(toml)) => return decode_toml(&toml),
            // A lone `---` is also a YAML document start marker.
            None if text.starts_with(YAML_FENCE) => {}
            None => {
                debug!("entry has no frontmatter block");
                return Ok(Record::new());
            }
        }
    }
    decode_yaml(text)
}

pub fn decode_yaml(text: &str) -> Result<Record> {
    if text.trim().is_empty() {
        return Ok(Record::new());
    }
    match serde_yaml::from_str::<Value>(text)? {
        Value::Mapping(record) => Ok(record),
        Value::Null => Ok(Record::new()),
        other => Err(Error::NotARecord(value_kind(&other))),
    }
}

pub fn decode_toml(text: &str) -> Result<Record> {
    let table: toml::Table = toml::from_str(text)?;
    Ok(table_to_record(table))
}

fn table_to_record(table: toml::Table) -> Record {
    let mut record = Mapping::new();
    for (key, value) in table {
        record.insert(Value::String(key), toml_to_yaml(value));
    }
    record
}

fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(table_to_record(table)),
    }
}
