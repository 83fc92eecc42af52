//! Configuration schema (schemaweave.toml)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn default_directories() -> Vec<PathBuf> {
    vec![PathBuf::from("schema")]
}

fn default_extension() -> String {
    "graphql".to_string()
}

fn default_cache_directory() -> PathBuf {
    PathBuf::from("cache")
}

fn default_fingerprint_file() -> String {
    "schema-fingerprint.json".to_string()
}

fn default_document_file() -> String {
    "schema-document.json".to_string()
}

fn default_placeholder_field() -> String {
    "_empty".to_string()
}

/// Where schema source files are discovered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Root directories scanned recursively, in order
    #[serde(default = "default_directories")]
    pub directories: Vec<PathBuf>,

    /// File extension identifying schema files (with or without a leading dot)
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            directories: default_directories(),
            extension: default_extension(),
        }
    }
}

impl SourceConfig {
    /// Extension without any leading dot
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

/// Location and switch for the compiled-schema cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether artifacts are read and written at all
    #[serde(default)]
    pub enabled: bool,

    /// Directory holding both cache artifacts
    #[serde(default = "default_cache_directory")]
    pub directory: PathBuf,

    /// File name of the fingerprint snapshot
    #[serde(default = "default_fingerprint_file")]
    pub fingerprint_file: String,

    /// File name of the document snapshot
    #[serde(default = "default_document_file")]
    pub document_file: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_cache_directory(),
            fingerprint_file: default_fingerprint_file(),
            document_file: default_document_file(),
        }
    }
}

impl CacheConfig {
    /// Create an enabled cache configuration rooted at `directory`
    pub fn enabled_at(directory: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Full path of the fingerprint snapshot
    pub fn fingerprint_path(&self) -> PathBuf {
        self.directory.join(&self.fingerprint_file)
    }

    /// Full path of the document snapshot
    pub fn document_path(&self) -> PathBuf {
        self.directory.join(&self.document_file)
    }
}

/// Settings consumed by requirement analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Root operation field that only exists to keep the type non-empty
    #[serde(default = "default_placeholder_field")]
    pub placeholder_field: String,

    /// Extra or replacement SDL scalar → target type translations
    #[serde(default)]
    pub type_mappings: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            placeholder_field: default_placeholder_field(),
            type_mappings: BTreeMap::new(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schema source discovery
    #[serde(default)]
    pub schema: SourceConfig,

    /// Compiled-schema cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Requirement analysis
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: SourceConfig::default(),
            cache: CacheConfig::default(),
            generator: GeneratorConfig::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Reject settings that cannot produce a working build
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema.normalized_extension().is_empty() {
            return Err(ConfigError::Invalid("schema.extension must not be empty".to_string()));
        }

        for (key, name) in [
            ("cache.fingerprint_file", &self.cache.fingerprint_file),
            ("cache.document_file", &self.cache.document_file),
        ] {
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a plain file name, got '{}'",
                    key, name
                )));
            }
        }

        if self.cache.fingerprint_file == self.cache.document_file {
            return Err(ConfigError::Invalid(
                "cache.fingerprint_file and cache.document_file must differ".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve a possibly relative path against the project root
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Schema source settings with directories resolved against the project root
    pub fn resolved_sources(&self) -> SourceConfig {
        SourceConfig {
            directories: self
                .schema
                .directories
                .iter()
                .map(|dir| self.resolve_path(dir))
                .collect(),
            extension: self.schema.extension.clone(),
        }
    }

    /// Cache settings with the directory resolved against the project root
    pub fn resolved_cache(&self) -> CacheConfig {
        CacheConfig {
            directory: self.resolve_path(&self.cache.directory),
            ..self.cache.clone()
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.schema.extension, "graphql");
        assert!(!config.cache.enabled);
        assert_eq!(config.generator.placeholder_field, "_empty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let config = Config::from_toml(
            r#"
            [schema]
            directories = ["schema", "modules/billing"]
            extension = ".graphqls"

            [cache]
            enabled = true
            directory = "var/cache"

            [generator.type_mappings]
            DateTime = "string"
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.directories.len(), 2);
        assert_eq!(config.schema.normalized_extension(), "graphqls");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.fingerprint_file, "schema-fingerprint.json");
        assert_eq!(
            config.generator.type_mappings.get("DateTime").map(String::as_str),
            Some("string")
        );
    }

    #[test]
    fn rejects_identical_artifact_names() {
        let result = Config::from_toml(
            r#"
            [cache]
            fingerprint_file = "cache.json"
            document_file = "cache.json"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_artifact_paths() {
        let result = Config::from_toml(
            r#"
            [cache]
            document_file = "nested/schema.json"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn relative_paths_resolve_against_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemaweave.toml");
        std::fs::write(&path, "[schema]\ndirectories = [\"schema\"]\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.resolved_sources().directories, vec![dir.path().join("schema")]);
        assert_eq!(config.resolved_cache().directory, dir.path().join("cache"));
        assert_eq!(
            config.resolved_cache().fingerprint_path(),
            dir.path().join("cache").join("schema-fingerprint.json")
        );
    }

    #[test]
    fn config_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemaweave.toml");

        let mut config = Config::default();
        config.cache.enabled = true;
        config.save_to_file(&path).unwrap();

        let parsed = Config::from_file(&path).unwrap();
        assert_eq!(config.cache, parsed.cache);
        assert_eq!(config.schema, parsed.schema);
    }
}
