//! Frontmatter schema for a static blog's content collections.
//!
//! [`collections`] is the declaration a site build reads: it maps `posts`
//! to a schema requiring a string `title` and a `date`, with optional
//! `draft`, `tags` and `description`. [`validate`] applies that schema to
//! one entry's metadata record and yields a typed [`PostFrontmatter`].
//! Finding and loading entries stays with the site generator.

pub mod collection;
pub mod config;
pub mod date;
pub mod error;
pub mod frontmatter;
pub mod record;
pub mod schema;

pub use collection::{collections, posts_schema, CollectionDefinition, Collections, ContentSource, POSTS};
pub use config::Config;
pub use error::{Error, FieldPath, PathSegment, Result, ValidationError};
pub use frontmatter::{validate, PostFrontmatter};
pub use record::{decode_record, extract_frontmatter, MetadataBlock};
pub use schema::{Field, FieldKind, ObjectSchema, Record, UnknownKeys};
