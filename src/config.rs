use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::collection::POSTS;
use crate::error::{Error, Result};
use crate::schema::UnknownKeys;

pub const DEFAULT_MANIFEST: &str = "frontcheck.toml";

/// Settings read from the `frontcheck.toml` manifest.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Collection an entry is checked against when none is named.
    pub collection: String,
    pub unknown_keys: UnknownKeys,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            collection: POSTS.to_string(),
            unknown_keys: UnknownKeys::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        if config.collection.is_empty() {
            return Err(Error::Config("collection must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Reads the manifest at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                info!(manifest = %path.display(), "loaded manifest");
                Config::from_toml_str(&contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(manifest = %path.display(), "no manifest, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_means_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.collection, "posts");
        assert_eq!(config.unknown_keys, UnknownKeys::Strip);
    }

    #[test]
    fn reads_policy() {
        let config = Config::from_toml_str("unknown_keys = \"strict\"\n").unwrap();
        assert_eq!(config.unknown_keys, UnknownKeys::Strict);
    }

    #[test]
    fn rejects_bad_manifests() {
        assert!(matches!(
            Config::from_toml_str("unknown_keys = \"loose\"\n"),
            Err(Error::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml_str("colection = \"posts\"\n"),
            Err(Error::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml_str("collection = \"\"\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_manifest_file_is_fine() {
        let config = Config::load(Path::new("does/not/exist/frontcheck.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
