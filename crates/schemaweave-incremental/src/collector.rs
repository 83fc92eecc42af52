//! Schema source discovery and fingerprinting
//!
//! Walks the configured root directories and records the modification time
//! of every schema file. The resulting [`Fingerprint`] is the change-detection
//! key for the whole source set.

use schemaweave_core::{Diagnostic, DiagnosticCode, Location, SourceConfig};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

/// Absolute file path → last-modified time (nanoseconds since the Unix epoch)
///
/// Entries are kept sorted, so equality is set equality and serialization
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint {
    entries: BTreeMap<PathBuf, u64>,
}

impl Fingerprint {
    /// Create an empty fingerprint
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file's modification time
    pub fn insert(&mut self, path: impl Into<PathBuf>, modified: u64) {
        self.entries.insert(path.into(), modified);
    }

    /// Iterate over `(path, modified)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&Path, u64)> {
        self.entries.iter().map(|(path, modified)| (path.as_path(), *modified))
    }

    /// File paths in sorted order
    pub fn files(&self) -> Vec<PathBuf> {
        self.entries.keys().cloned().collect()
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no files were found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable SHA-256 digest (hex) of the fingerprint contents
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (path, modified) in &self.entries {
            hasher.update(path.to_string_lossy().as_bytes());
            hasher.update([0u8]);
            hasher.update(modified.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

impl FromIterator<(PathBuf, u64)> for Fingerprint {
    fn from_iter<I: IntoIterator<Item = (PathBuf, u64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Files found by a collection pass
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub fingerprint: Fingerprint,

    /// Warnings for skipped directories
    pub diagnostics: Vec<Diagnostic>,
}

/// Recursively discovers schema files under root directories
#[derive(Debug, Clone)]
pub struct SourceCollector {
    directories: Vec<PathBuf>,
    extension: String,
}

impl SourceCollector {
    /// Create a collector for the given roots and file extension
    ///
    /// The extension may be given with or without a leading dot.
    pub fn new(directories: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            directories,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Create a collector from source settings
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.directories.clone(), config.extension.clone())
    }

    /// Root directories in scan order
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Extension without the leading dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Walk every root and fingerprint the schema files found
    ///
    /// Directories that cannot be listed are skipped with a warning. A schema
    /// file whose modification time cannot be read aborts the collection,
    /// whether the walk itself fails on it or its metadata does.
    pub fn collect(&self) -> Result<Collection, CollectError> {
        let mut collection = Collection::default();

        for root in &self.directories {
            for entry in WalkDir::new(root).follow_links(true) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        let path = err.path().unwrap_or(root.as_path()).to_path_buf();
                        if self.is_unreadable_source(&err, &path) {
                            let source = err.into_io_error().unwrap_or_else(|| {
                                std::io::Error::new(std::io::ErrorKind::Other, "unreadable schema file")
                            });
                            return Err(CollectError::Unreadable { path, source });
                        }

                        tracing::warn!(path = %path.display(), error = %err, "skipping directory");
                        collection.diagnostics.push(
                            Diagnostic::warn(
                                DiagnosticCode::SourceDirectorySkipped,
                                format!("skipped unreadable path: {}", err),
                            )
                            .with_location(Location::new(path.display().to_string())),
                        );
                        continue;
                    }
                };

                if !entry.file_type().is_file() || !self.matches(entry.path()) {
                    continue;
                }

                let modified = entry
                    .metadata()
                    .map_err(std::io::Error::from)
                    .and_then(|metadata| metadata.modified())
                    .map_err(|source| CollectError::Unreadable {
                        path: entry.path().to_path_buf(),
                        source,
                    })?;

                let path = entry
                    .path()
                    .canonicalize()
                    .map_err(|source| CollectError::Unreadable {
                        path: entry.path().to_path_buf(),
                        source,
                    })?;

                let modified = epoch_nanos(modified);
                tracing::debug!(path = %path.display(), modified, "discovered schema file");
                collection.fingerprint.insert(path, modified);
            }
        }

        tracing::debug!(
            files = collection.fingerprint.len(),
            skipped = collection.diagnostics.len(),
            "collection complete"
        );

        Ok(collection)
    }

    /// A walk error below a root on a schema-file path that is not a directory,
    /// such as a dangling symlink
    fn is_unreadable_source(&self, err: &walkdir::Error, path: &Path) -> bool {
        err.depth() > 0 && err.loop_ancestor().is_none() && !path.is_dir() && self.matches(path)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext == self.extension.as_str())
            .unwrap_or(false)
    }
}

/// Nanoseconds since the Unix epoch; pre-epoch times map to 0
fn epoch_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Collection error types
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("cannot read modification time of {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollectError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Unreadable { path, .. } => {
                Diagnostic::error(DiagnosticCode::SourceFileUnreadable, self.to_string())
                    .with_location(Location::new(path.display().to_string()))
            }
        }
    }
}
