use std::fmt;
use thiserror::Error;

/// One step into a record: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a frontmatter record, e.g. `tags[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        FieldPath::default()
    }

    pub fn field(name: &str) -> Self {
        FieldPath {
            segments: vec![PathSegment::Key(name.to_string())],
        }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        FieldPath { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Name of the top-level field this path starts at, if any.
    pub fn top_level(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Key(key)) => Some(key.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A frontmatter record did not match its collection schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{path}: required")]
    Required { path: FieldPath },

    #[error("{path}: expected {expected}, received {received}")]
    InvalidType {
        path: FieldPath,
        expected: String,
        received: String,
    },

    #[error("{path}: invalid date '{input}'")]
    InvalidDate { path: FieldPath, input: String },

    #[error("(root): unrecognized keys {}", .keys.join(", "))]
    UnrecognizedKeys { keys: Vec<String> },
}

impl ValidationError {
    pub fn path(&self) -> FieldPath {
        match self {
            ValidationError::Required { path }
            | ValidationError::InvalidType { path, .. }
            | ValidationError::InvalidDate { path, .. } => path.clone(),
            ValidationError::UnrecognizedKeys { .. } => FieldPath::root(),
        }
    }

    /// Top-level field the error points at. Empty for root-level errors.
    pub fn field(&self) -> String {
        self.path().top_level().unwrap_or_default().to_string()
    }

    pub fn reason(&self) -> String {
        match self {
            ValidationError::Required { .. } => "required".to_string(),
            ValidationError::InvalidType {
                expected, received, ..
            } => format!("expected {expected}, received {received}"),
            ValidationError::InvalidDate { .. } => "invalid date".to_string(),
            ValidationError::UnrecognizedKeys { keys } => {
                format!("unrecognized keys: {}", keys.join(", "))
            }
        }
    }
}

/// Errors surfaced by decoding, configuration and collection lookup.
#[derive(Error, Debug)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("yaml parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("toml parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("markdown parsing error: {0}")]
    Markdown(String),

    #[error("metadata block is a {0}, not a key/value record")]
    NotARecord(&'static str),

    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("manifest error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
