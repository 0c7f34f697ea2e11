use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::{self, Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::collection::posts_schema;
use crate::date::{format_date, is_representable, parse_date};
use crate::error::{FieldPath, ValidationError};
use crate::schema::{Record, UnknownKeys};

/// Validated metadata of an entry in the `posts` collection.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PostFrontmatter {
    pub title: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    pub draft: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
}

impl PostFrontmatter {
    /// Checks `record` against the posts schema under the given policy for
    /// undeclared keys and projects it onto the typed frontmatter. Keys the
    /// type does not name are dropped.
    pub fn from_record(record: &Record, unknown_keys: UnknownKeys) -> Result<Self, ValidationError> {
        let checked = posts_schema().with_unknown_keys(unknown_keys).check(record)?;
        // The posts schema has already checked every field this type reads,
        // so the projection cannot fail on a checked record.
        let post: PostFrontmatter =
            serde_yaml::from_value(Value::Mapping(checked)).map_err(|e| {
                ValidationError::InvalidType {
                    path: FieldPath::root(),
                    expected: "posts frontmatter".to_string(),
                    received: e.to_string(),
                }
            })?;
        debug!(title = %post.title, date = %format_date(&post.date), "validated post frontmatter");
        Ok(post)
    }

    /// Absent `draft` means published.
    pub fn is_draft(&self) -> bool {
        self.draft.unwrap_or(false)
    }
}

/// Validates one `posts` entry's metadata record.
pub fn validate(record: &Record) -> Result<PostFrontmatter, ValidationError> {
    PostFrontmatter::from_record(record, UnknownKeys::default())
}

impl Serialize for PostFrontmatter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if !is_representable(&self.date) {
            return Err(ser::Error::custom(format!(
                "date {} is outside the years frontmatter can carry",
                self.date
            )));
        }

        let mut map = serializer.serialize_map(None)?;

        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("date", &format_date(&self.date))?;
        if let Some(draft) = &self.draft {
            map.serialize_entry("draft", draft)?;
        }
        if let Some(tags) = &self.tags {
            map.serialize_entry("tags", tags)?;
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }

        map.end()
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = String::deserialize(deserializer)?;
    parse_date(&input).ok_or_else(|| de::Error::custom(format!("invalid date '{input}'")))
}
