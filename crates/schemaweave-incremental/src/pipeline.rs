//! Build pipeline
//!
//! collect → (no files: error) → cache lookup → (miss) merge → persist

use crate::cache::{CacheLookup, MissReason, SchemaCache};
use crate::collector::{CollectError, Fingerprint, SourceCollector};
use schemaweave_core::{Config, Diagnostic, DiagnosticCode, Location, MergedDocument, Severity};
use schemaweave_sdl::{MergeError, SchemaMerger};
use std::path::PathBuf;

/// How the cache took part in a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Caching is turned off
    Disabled,

    /// The document came from the cache
    Hit,

    /// The document was merged; `persisted` tells whether artifacts were written
    Miss { persisted: bool },
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub document: MergedDocument,
    pub fingerprint: Fingerprint,
    pub cache_status: CacheStatus,

    /// Non-fatal findings from every stage
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds the merged document for a set of source directories
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    collector: SourceCollector,
    cache: SchemaCache,
    merger: SchemaMerger,
}

impl SchemaBuilder {
    /// Create a builder from a collector and a cache
    pub fn new(collector: SourceCollector, cache: SchemaCache) -> Self {
        Self {
            collector,
            cache,
            merger: SchemaMerger::new(),
        }
    }

    /// Create a builder with paths resolved against the config's project root
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            SourceCollector::from_config(&config.resolved_sources()),
            SchemaCache::new(config.resolved_cache()),
        )
    }

    /// The cache used by this builder
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Run one build
    pub fn build(&self) -> Result<BuildOutput, BuildError> {
        let collection = self.collector.collect()?;
        let fingerprint = collection.fingerprint;
        let mut diagnostics = collection.diagnostics;

        if fingerprint.is_empty() {
            return Err(BuildError::NoSourceFiles {
                directories: self.collector.directories().to_vec(),
            });
        }

        match self.cache.lookup(&fingerprint) {
            CacheLookup::Hit(document) => {
                tracing::info!(files = fingerprint.len(), "schema cache hit");
                return Ok(BuildOutput {
                    document,
                    fingerprint,
                    cache_status: CacheStatus::Hit,
                    diagnostics,
                });
            }
            CacheLookup::Miss(reason) => {
                if let MissReason::SnapshotInvalid(detail) = &reason {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::CacheArtifactInvalid,
                            Severity::Info,
                            format!("ignored cached document: {}", detail),
                        )
                        .with_location(Location::new(self.cache.document_path().display().to_string())),
                    );
                }
                tracing::info!(%reason, files = fingerprint.len(), "schema cache miss");
            }
        }

        let outcome = self.merger.merge_files(&fingerprint.files())?;
        diagnostics.extend(outcome.diagnostics);

        let cache_status = if self.cache.is_enabled() {
            match self.cache.store(&fingerprint, &outcome.document) {
                Ok(()) => CacheStatus::Miss { persisted: true },
                Err(err) => {
                    tracing::warn!(error = %err, "failed to persist schema cache, continuing uncached");
                    diagnostics.push(err.to_diagnostic());
                    CacheStatus::Miss { persisted: false }
                }
            }
        } else {
            CacheStatus::Disabled
        };

        tracing::info!(
            files = fingerprint.len(),
            definitions = outcome.document.len(),
            ?cache_status,
            "schema build complete"
        );

        Ok(BuildOutput {
            document: outcome.document,
            fingerprint,
            cache_status,
            diagnostics,
        })
    }
}

fn display_directories(directories: &[PathBuf]) -> String {
    let names: Vec<String> = directories.iter().map(|d| d.display().to_string()).collect();
    names.join(", ")
}

/// Build error types
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no schema files found under [{}]", display_directories(.directories))]
    NoSourceFiles { directories: Vec<PathBuf> },

    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

impl BuildError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::NoSourceFiles { .. } => {
                Diagnostic::error(DiagnosticCode::SourceFilesMissing, self.to_string())
            }
            Self::Collect(e) => e.to_diagnostic(),
            Self::Merge(e) => e.to_diagnostic(),
        }
    }
}
