//! The content collections this site declares.
//!
//! The build framework asks [`collections`] for the declaration and applies
//! each collection's schema to every entry it discovers. Only `posts` is
//! declared here.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::frontmatter::PostFrontmatter;
use crate::schema::{Field, FieldKind, ObjectSchema, Record, UnknownKeys};

pub const POSTS: &str = "posts";

/// Where a collection's entries come from. Loading is left to the framework.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Markdown entries carrying a frontmatter block.
    #[default]
    Content,
    /// Plain YAML, JSON or TOML data files.
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionDefinition {
    pub source: ContentSource,
    pub schema: ObjectSchema,
}

impl CollectionDefinition {
    pub fn new(schema: ObjectSchema) -> Self {
        CollectionDefinition {
            source: ContentSource::default(),
            schema,
        }
    }
}

pub fn posts_schema() -> ObjectSchema {
    ObjectSchema::new(vec![
        Field::required("title", FieldKind::String),
        Field::required("date", FieldKind::Date),
        Field::optional("draft", FieldKind::Boolean),
        Field::optional("tags", FieldKind::Array(Box::new(FieldKind::String))),
        Field::optional("description", FieldKind::String),
    ])
}

/// Named collection declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Collections {
    entries: BTreeMap<String, CollectionDefinition>,
}

impl Collections {
    pub fn get(&self, name: &str) -> Result<&CollectionDefinition> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::UnknownCollection(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Applies one policy for undeclared keys to every collection.
    pub fn with_unknown_keys(mut self, unknown_keys: UnknownKeys) -> Self {
        for definition in self.entries.values_mut() {
            definition.schema.unknown_keys = unknown_keys;
        }
        self
    }

    /// Validates `record` as an entry of collection `name` and returns the
    /// normalized record.
    pub fn validate(&self, name: &str, record: &Record) -> Result<Record> {
        let definition = self.get(name)?;
        debug!(collection = name, keys = record.len(), "validating entry");
        Ok(definition.schema.check(record)?)
    }

    /// Validates `record` as a typed `posts` entry.
    pub fn validate_post(&self, record: &Record) -> Result<PostFrontmatter> {
        let definition = self.get(POSTS)?;
        Ok(PostFrontmatter::from_record(record, definition.schema.unknown_keys)?)
    }
}

/// The collections export: `posts` mapped to its schema.
pub fn collections() -> Collections {
    let mut entries = BTreeMap::new();
    entries.insert(POSTS.to_string(), CollectionDefinition::new(posts_schema()));
    Collections { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn exports_only_posts() {
        let declared = collections();
        assert_eq!(declared.names().collect::<Vec<_>>(), vec!["posts"]);
        let posts = declared.get("posts").unwrap();
        assert_eq!(posts.source, ContentSource::Content);
        let names: Vec<&str> = posts.schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "date", "draft", "tags", "description"]);
    }

    #[test]
    fn unknown_collection_is_an_error() {
        let record = Record::new();
        match collections().validate("pages", &record) {
            Err(Error::UnknownCollection(name)) => assert_eq!(name, "pages"),
            other => panic!("expected unknown collection, got {other:?}"),
        }
    }

    #[test]
    fn strict_policy_reaches_typed_validation() {
        let record: Record = serde_yaml::from_str("title: a\ndate: 2024-01-01\nslug: a").unwrap();
        let strict = collections().with_unknown_keys(UnknownKeys::Strict);
        match strict.validate_post(&record) {
            Err(Error::Validation(ValidationError::UnrecognizedKeys { keys })) => {
                assert_eq!(keys, vec!["slug".to_string()])
            }
            other => panic!("expected unrecognized keys, got {other:?}"),
        }
        assert!(collections().validate_post(&record).is_ok());
    }
}
