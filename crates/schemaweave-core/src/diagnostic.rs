//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Source discovery (1xxx)
    /// A configured or nested directory could not be listed and was skipped
    SourceDirectorySkipped,

    /// A discovered schema file could not be read or stat'ed
    SourceFileUnreadable,

    /// No schema files were found under the configured directories
    SourceFilesMissing,

    // SDL front-end (2xxx)
    /// Failed to parse an SDL file
    SdlParseError,

    /// A definition kind the merger does not handle was skipped
    SdlDefinitionSkipped,

    // Merging (3xxx)
    /// Two files define the same type differently
    MergeDefinitionConflict,

    /// Two files define the same root operation field differently
    MergeRootFieldConflict,

    // Cache (4xxx)
    /// Cache artifacts could not be written; the build continued uncached
    CacheWriteFailed,

    /// A persisted cache artifact was unreadable or stale and was ignored
    CacheArtifactInvalid,

    // Analysis (5xxx)
    /// A requested requirement kind produced no descriptors
    AnalysisNoRequirements,

    /// A type reference had a shape the analyzer cannot resolve
    AnalysisInvalidTypeReference,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceDirectorySkipped => "SOURCE_DIRECTORY_SKIPPED",
            Self::SourceFileUnreadable => "SOURCE_FILE_UNREADABLE",
            Self::SourceFilesMissing => "SOURCE_FILES_MISSING",
            Self::SdlParseError => "SDL_PARSE_ERROR",
            Self::SdlDefinitionSkipped => "SDL_DEFINITION_SKIPPED",
            Self::MergeDefinitionConflict => "MERGE_DEFINITION_CONFLICT",
            Self::MergeRootFieldConflict => "MERGE_ROOT_FIELD_CONFLICT",
            Self::CacheWriteFailed => "CACHE_WRITE_FAILED",
            Self::CacheArtifactInvalid => "CACHE_ARTIFACT_INVALID",
            Self::AnalysisNoRequirements => "ANALYSIS_NO_REQUIREMENTS",
            Self::AnalysisInvalidTypeReference => "ANALYSIS_INVALID_TYPE_REFERENCE",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - the build continued but something was skipped
    Warn,

    /// Error - the build was aborted
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File or directory path
    pub file: String,

    /// Optional line number (1-indexed)
    pub line: Option<usize>,

    /// Optional column number (1-indexed)
    pub column: Option<usize>,
}

impl Location {
    /// Create a new location with just a file path
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            column: None,
        }
    }

    /// Create a location with file, line, and column
    pub fn with_position(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{}:{}:{}", self.file, line, column),
            (Some(line), None) => write!(f, "{}:{}", self.file, line),
            _ => write!(f, "{}", self.file),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source location (best-effort)
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
        }
    }

    /// Shorthand for an error-level diagnostic
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    /// Shorthand for a warning-level diagnostic
    pub fn warn(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, message)
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}
