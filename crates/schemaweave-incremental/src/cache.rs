//! Compiled-schema cache
//!
//! Persists the source fingerprint and the merged document as two JSON files.
//! The two files are one logical unit: the document snapshot records the
//! digest of the fingerprint it was built from, and a lookup only hits when
//! the stored fingerprint, the current fingerprint and that digest all agree.
//!
//! Reads are fail-safe: any unreadable or mismatched artifact is a miss,
//! never an error. No locking is performed; concurrent writers race and the
//! last one wins.

use crate::collector::Fingerprint;
use schemaweave_core::{CacheConfig, Diagnostic, DiagnosticCode, Location, MergedDocument};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version of the document snapshot layout. Bump on incompatible changes.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// On-disk envelope of the merged document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub format_version: u32,

    /// Digest of the fingerprint this document was merged from
    pub fingerprint_digest: String,

    pub document: MergedDocument,
}

#[derive(Serialize)]
struct DocumentSnapshotRef<'a> {
    format_version: u32,
    fingerprint_digest: String,
    document: &'a MergedDocument,
}

/// Why a lookup did not hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// Caching is turned off
    Disabled,

    /// No readable fingerprint snapshot exists yet
    NoFingerprint,

    /// The source files changed since the artifacts were written
    FingerprintChanged,

    /// The fingerprint matches but the document snapshot is absent
    SnapshotMissing,

    /// The document snapshot could not be used
    SnapshotInvalid(String),
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "caching disabled"),
            Self::NoFingerprint => write!(f, "no stored fingerprint"),
            Self::FingerprintChanged => write!(f, "source files changed"),
            Self::SnapshotMissing => write!(f, "document snapshot missing"),
            Self::SnapshotInvalid(detail) => write!(f, "document snapshot invalid: {}", detail),
        }
    }
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(MergedDocument),
    Miss(MissReason),
}

/// Fingerprint-keyed store for the merged document
#[derive(Debug, Clone)]
pub struct SchemaCache {
    config: CacheConfig,
}

impl SchemaCache {
    /// Create a cache from resolved settings
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Create a cache that never reads or writes
    pub fn disabled() -> Self {
        Self::new(CacheConfig::default())
    }

    /// Whether artifacts are read and written
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Settings in use
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Path of the fingerprint snapshot
    pub fn fingerprint_path(&self) -> PathBuf {
        self.config.fingerprint_path()
    }

    /// Path of the document snapshot
    pub fn document_path(&self) -> PathBuf {
        self.config.document_path()
    }

    /// Load the stored fingerprint, returning `None` if it doesn't exist or
    /// can't be parsed
    pub fn load_fingerprint(&self) -> Option<Fingerprint> {
        let content = std::fs::read_to_string(self.fingerprint_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Decide hit or miss for the current fingerprint
    pub fn lookup(&self, current: &Fingerprint) -> CacheLookup {
        if !self.is_enabled() {
            return CacheLookup::Miss(MissReason::Disabled);
        }

        let Some(stored) = self.load_fingerprint() else {
            return CacheLookup::Miss(MissReason::NoFingerprint);
        };

        if stored != *current {
            return CacheLookup::Miss(MissReason::FingerprintChanged);
        }

        let path = self.document_path();
        if !path.exists() {
            return CacheLookup::Miss(MissReason::SnapshotMissing);
        }

        match self.load_snapshot(&path, current) {
            Ok(document) => CacheLookup::Hit(document),
            Err(detail) => CacheLookup::Miss(MissReason::SnapshotInvalid(detail)),
        }
    }

    fn load_snapshot(&self, path: &Path, current: &Fingerprint) -> Result<MergedDocument, String> {
        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let snapshot: DocumentSnapshot =
            serde_json::from_str(&content).map_err(|e| format!("cannot decode: {}", e))?;

        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(format!(
                "format version {} (expected {})",
                snapshot.format_version, SNAPSHOT_FORMAT_VERSION
            ));
        }

        if snapshot.fingerprint_digest != current.digest() {
            return Err("fingerprint digest does not match".to_string());
        }

        Ok(snapshot.document)
    }

    /// Persist both artifacts for a freshly merged document
    ///
    /// On failure the fingerprint file is removed so that no stale pair can
    /// produce a hit.
    pub fn store(&self, fingerprint: &Fingerprint, document: &MergedDocument) -> Result<(), CacheError> {
        let result = self.write_artifacts(fingerprint, document);
        if result.is_err() {
            let _ = std::fs::remove_file(self.fingerprint_path());
        }
        result
    }

    fn write_artifacts(&self, fingerprint: &Fingerprint, document: &MergedDocument) -> Result<(), CacheError> {
        let dir = &self.config.directory;
        std::fs::create_dir_all(dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;

        // The fingerprint goes last; until it is written the pair cannot hit.
        remove_if_exists(&self.fingerprint_path())?;

        let snapshot = DocumentSnapshotRef {
            format_version: SNAPSHOT_FORMAT_VERSION,
            fingerprint_digest: fingerprint.digest(),
            document,
        };
        let json = serde_json::to_string_pretty(&snapshot).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        write_atomic(&self.document_path(), &json)?;

        let json = serde_json::to_string_pretty(fingerprint).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        write_atomic(&self.fingerprint_path(), &json)?;

        tracing::debug!(directory = %dir.display(), files = fingerprint.len(), "cache artifacts written");
        Ok(())
    }

    /// Remove both artifacts; missing files are not an error
    pub fn clear(&self) -> Result<(), CacheError> {
        remove_if_exists(&self.fingerprint_path())?;
        remove_if_exists(&self.document_path())
    }
}

fn remove_if_exists(path: &Path) -> Result<(), CacheError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write to a sibling temp file, then rename over the target
fn write_atomic(path: &Path, contents: &str) -> Result<(), CacheError> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, contents).map_err(|e| CacheError::Io {
        path: tmp.clone(),
        source: e,
    })?;
    std::fs::rename(&tmp, path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Cache error types
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cache serialization error: {reason}")]
    Serialization { reason: String },
}

impl CacheError {
    /// Convert to a (warning) diagnostic; write failures never abort a build
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warn(DiagnosticCode::CacheWriteFailed, self.to_string());
        match self {
            Self::Io { path, .. } => diag.with_location(Location::new(path.display().to_string())),
            Self::Serialization { .. } => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaweave_core::{Definition, ObjectTypeDefinition, FieldDefinition, TypeReference};

    fn document() -> MergedDocument {
        MergedDocument::from_definitions(vec![Definition::Object(ObjectTypeDefinition::new(
            "Query",
            vec![FieldDefinition::new("ok", TypeReference::named("Boolean"))],
        ))])
    }

    fn fingerprint(modified: u64) -> Fingerprint {
        let mut fp = Fingerprint::new();
        fp.insert("/schema/query.graphql", modified);
        fp
    }

    #[test]
    fn disabled_cache_always_misses() {
        let cache = SchemaCache::disabled();
        assert_eq!(cache.lookup(&fingerprint(1)), CacheLookup::Miss(MissReason::Disabled));
    }

    #[test]
    fn store_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SchemaCache::new(CacheConfig::enabled_at(dir.path().join("cache")));

        assert_eq!(cache.lookup(&fingerprint(1)), CacheLookup::Miss(MissReason::NoFingerprint));

        cache.store(&fingerprint(1), &document()).unwrap();
        assert_eq!(cache.lookup(&fingerprint(1)), CacheLookup::Hit(document()));
        assert_eq!(
            cache.lookup(&fingerprint(2)),
            CacheLookup::Miss(MissReason::FingerprintChanged)
        );
    }

    #[test]
    fn missing_snapshot_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SchemaCache::new(CacheConfig::enabled_at(dir.path()));

        cache.store(&fingerprint(1), &document()).unwrap();
        std::fs::remove_file(cache.document_path()).unwrap();

        assert_eq!(cache.lookup(&fingerprint(1)), CacheLookup::Miss(MissReason::SnapshotMissing));
    }

    #[test]
    fn corrupt_snapshot_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SchemaCache::new(CacheConfig::enabled_at(dir.path()));

        cache.store(&fingerprint(1), &document()).unwrap();
        std::fs::write(cache.document_path(), "{ not json").unwrap();

        assert!(matches!(
            cache.lookup(&fingerprint(1)),
            CacheLookup::Miss(MissReason::SnapshotInvalid(_))
        ));
    }

    #[test]
    fn version_mismatch_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SchemaCache::new(CacheConfig::enabled_at(dir.path()));

        cache.store(&fingerprint(1), &document()).unwrap();
        let snapshot = DocumentSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION + 1,
            fingerprint_digest: fingerprint(1).digest(),
            document: document(),
        };
        std::fs::write(cache.document_path(), serde_json::to_string(&snapshot).unwrap()).unwrap();

        match cache.lookup(&fingerprint(1)) {
            CacheLookup::Miss(MissReason::SnapshotInvalid(detail)) => {
                assert!(detail.contains("format version"))
            }
            other => panic!("unexpected lookup: {:?}", other),
        }
    }

    #[test]
    fn foreign_snapshot_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SchemaCache::new(CacheConfig::enabled_at(dir.path()));

        // Document from another source set paired with the current fingerprint
        cache.store(&fingerprint(2), &document()).unwrap();
        let document_json = std::fs::read_to_string(cache.document_path()).unwrap();
        cache.store(&fingerprint(1), &document()).unwrap();
        std::fs::write(cache.document_path(), document_json).unwrap();

        assert!(matches!(
            cache.lookup(&fingerprint(1)),
            CacheLookup::Miss(MissReason::SnapshotInvalid(_))
        ));
    }

    #[test]
    fn write_failure_leaves_no_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("cache");
        std::fs::write(&blocker, "not a directory").unwrap();

        let cache = SchemaCache::new(CacheConfig::enabled_at(&blocker));
        let err = cache.store(&fingerprint(1), &document()).unwrap_err();

        assert!(matches!(err, CacheError::Io { .. }));
        assert_eq!(err.to_diagnostic().code, DiagnosticCode::CacheWriteFailed);
        assert!(cache.load_fingerprint().is_none());
    }

    #[test]
    fn clear_removes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SchemaCache::new(CacheConfig::enabled_at(dir.path()));

        cache.clear().unwrap();
        cache.store(&fingerprint(1), &document()).unwrap();
        assert!(cache.fingerprint_path().exists());

        cache.clear().unwrap();
        assert!(!cache.fingerprint_path().exists());
        assert!(!cache.document_path().exists());
    }

    #[test]
    fn artifacts_are_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SchemaCache::new(CacheConfig::enabled_at(dir.path()));

        cache.store(&fingerprint(1), &document()).unwrap();
        let first = std::fs::read(cache.document_path()).unwrap();
        cache.store(&fingerprint(1), &document()).unwrap();
        let second = std::fs::read(cache.document_path()).unwrap();

        assert_eq!(first, second);
    }
}
