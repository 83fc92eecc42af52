//! Multi-file schema merging
//!
//! Unions the documents of every source file into one [`MergedDocument`].
//! Scalars, named types and input objects are de-duplicated by name within
//! their class; the root operation types merge field by field. A repeated
//! name is accepted only when the two definitions are structurally equal.

use crate::parser::{ParseError, SdlParser};
use schemaweave_core::{
    Definition, DefinitionClass, Diagnostic, DiagnosticCode, FieldDefinition, Location,
    MergedDocument, ObjectTypeDefinition, OperationKind, SchemaDocument,
};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Result of a successful merge
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged document
    pub document: MergedDocument,

    /// Non-fatal findings (skipped definitions)
    pub diagnostics: Vec<Diagnostic>,
}

/// Merges SDL files into a single document
#[derive(Debug, Clone, Default)]
pub struct SchemaMerger {
    parser: SdlParser,
}

impl SchemaMerger {
    /// Create a new merger
    pub fn new() -> Self {
        Self::default()
    }

    /// Read, parse and merge files in the given order
    pub fn merge_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<MergeOutcome, MergeError> {
        if paths.is_empty() {
            return Err(MergeError::NoFiles);
        }

        let mut state = MergeState::default();
        for path in paths {
            let path = path.as_ref();
            let sdl = std::fs::read_to_string(path).map_err(|source| MergeError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            let parsed = self.parser.parse(&sdl, Some(path))?;
            state.diagnostics.extend(parsed.diagnostics());
            state.add_document(&path.display().to_string(), parsed.document)?;
        }

        Ok(state.finish())
    }

    /// Merge in-memory `(origin, text)` sources in the given order
    pub fn merge_sources<'s, I>(&self, sources: I) -> Result<MergeOutcome, MergeError>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        let mut state = MergeState::default();
        let mut seen_any = false;

        for (origin, sdl) in sources {
            seen_any = true;
            let parsed = self.parser.parse(sdl, Some(Path::new(origin)))?;
            state.diagnostics.extend(parsed.diagnostics());
            state.add_document(origin, parsed.document)?;
        }

        if !seen_any {
            return Err(MergeError::NoFiles);
        }

        Ok(state.finish())
    }

    /// Merge already parsed documents in the given order
    pub fn merge_documents<'d, I>(&self, documents: I) -> Result<MergedDocument, MergeError>
    where
        I: IntoIterator<Item = (&'d str, SchemaDocument)>,
    {
        let mut state = MergeState::default();
        let mut seen_any = false;

        for (origin, document) in documents {
            seen_any = true;
            state.add_document(origin, document)?;
        }

        if !seen_any {
            return Err(MergeError::NoFiles);
        }

        Ok(state.finish().document)
    }
}

/// First-seen entries keyed by name, remembering where each came from
struct Bucket<T> {
    entries: Vec<(T, String)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: PartialEq> Bucket<T> {
    /// Insert unless already present; on a structural mismatch returns the
    /// origin of the stored entry
    fn insert(&mut self, name: &str, item: T, origin: &str) -> Result<bool, String> {
        match self.index.get(name) {
            Some(&i) => {
                let (existing, first_origin) = &self.entries[i];
                if *existing == item {
                    Ok(false)
                } else {
                    Err(first_origin.clone())
                }
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((item, origin.to_string()));
                Ok(true)
            }
        }
    }

    fn origin_of(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&i| self.entries[i].1.as_str())
    }

    fn first_origin(&self) -> Option<&str> {
        self.entries.first().map(|(_, origin)| origin.as_str())
    }

    fn into_items(self) -> impl Iterator<Item = T> {
        self.entries.into_iter().map(|(item, _)| item)
    }
}

#[derive(Default)]
struct MergeState {
    scalars: Bucket<Definition>,
    named_types: Bucket<Definition>,
    inputs: Bucket<Definition>,
    root_fields: BTreeMap<OperationKind, Bucket<FieldDefinition>>,
    diagnostics: Vec<Diagnostic>,
}

impl MergeState {
    fn add_document(&mut self, origin: &str, document: SchemaDocument) -> Result<(), MergeError> {
        for definition in document.definitions {
            let definition = match definition {
                Definition::Object(object) => match OperationKind::from_type_name(&object.name) {
                    Some(kind) => {
                        self.add_root_fields(origin, kind, object)?;
                        continue;
                    }
                    None => Definition::Object(object),
                },
                other => other,
            };

            let class = definition.class();
            let name = definition.name().to_string();

            // Root type names belong to the synthesized root object
            if class == DefinitionClass::NamedType {
                let root_origin = OperationKind::from_type_name(&name)
                    .and_then(|kind| self.root_fields.get(&kind))
                    .and_then(|fields| fields.first_origin());
                if let Some(first) = root_origin {
                    return Err(MergeError::DefinitionConflict {
                        class,
                        name,
                        first: first.to_string(),
                        second: origin.to_string(),
                    });
                }
            }

            let bucket = match class {
                DefinitionClass::Scalar => &mut self.scalars,
                DefinitionClass::NamedType => &mut self.named_types,
                DefinitionClass::InputObject => &mut self.inputs,
            };

            match bucket.insert(&name, definition, origin) {
                Ok(true) => tracing::debug!(%class, name = %name, origin, "merged definition"),
                Ok(false) => tracing::debug!(%class, name = %name, origin, "discarded identical duplicate"),
                Err(first) => {
                    return Err(MergeError::DefinitionConflict {
                        class,
                        name,
                        first,
                        second: origin.to_string(),
                    })
                }
            }
        }

        Ok(())
    }

    fn add_root_fields(
        &mut self,
        origin: &str,
        kind: OperationKind,
        object: ObjectTypeDefinition,
    ) -> Result<(), MergeError> {
        if !object.fields.is_empty() {
            if let Some(first) = self.named_types.origin_of(kind.type_name()) {
                return Err(MergeError::DefinitionConflict {
                    class: DefinitionClass::NamedType,
                    name: kind.type_name().to_string(),
                    first: first.to_string(),
                    second: origin.to_string(),
                });
            }
        }

        let bucket = self.root_fields.entry(kind).or_default();

        for field in object.fields {
            let name = field.name.clone();
            match bucket.insert(&name, field, origin) {
                Ok(_) => tracing::debug!(%kind, field = %name, origin, "merged root field"),
                Err(first) => {
                    return Err(MergeError::RootFieldConflict {
                        kind,
                        field: name,
                        first,
                        second: origin.to_string(),
                    })
                }
            }
        }

        Ok(())
    }

    fn finish(mut self) -> MergeOutcome {
        let mut definitions: Vec<Definition> = Vec::new();
        definitions.extend(self.scalars.into_items());
        definitions.extend(self.named_types.into_items());
        definitions.extend(self.inputs.into_items());

        for kind in OperationKind::ALL {
            let Some(bucket) = self.root_fields.remove(&kind) else {
                continue;
            };
            let fields: Vec<FieldDefinition> = bucket.into_items().collect();
            if !fields.is_empty() {
                definitions.push(Definition::Object(ObjectTypeDefinition::new(
                    kind.type_name(),
                    fields,
                )));
            }
        }

        tracing::debug!(definitions = definitions.len(), "merge complete");

        MergeOutcome {
            document: MergedDocument::from_definitions(definitions),
            diagnostics: self.diagnostics,
        }
    }
}

/// Merge error types
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("no schema files to merge")]
    NoFiles,

    #[error("failed to read schema file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("conflicting definitions of {class} '{name}' in {first} and {second}")]
    DefinitionConflict {
        class: DefinitionClass,
        name: String,
        first: String,
        second: String,
    },

    #[error("conflicting definitions of root field '{kind}.{field}' in {first} and {second}")]
    RootFieldConflict {
        kind: OperationKind,
        field: String,
        first: String,
        second: String,
    },
}

impl MergeError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::NoFiles => Diagnostic::error(DiagnosticCode::SourceFilesMissing, self.to_string()),
            Self::Read { path, .. } => {
                Diagnostic::error(DiagnosticCode::SourceFileUnreadable, self.to_string())
                    .with_location(Location::new(path.display().to_string()))
            }
            Self::Parse(e) => e.to_diagnostic(),
            Self::DefinitionConflict { second, .. } => {
                Diagnostic::error(DiagnosticCode::MergeDefinitionConflict, self.to_string())
                    .with_location(Location::new(second.clone()))
            }
            Self::RootFieldConflict { second, .. } => {
                Diagnostic::error(DiagnosticCode::MergeRootFieldConflict, self.to_string())
                    .with_location(Location::new(second.clone()))
            }
        }
    }
}
