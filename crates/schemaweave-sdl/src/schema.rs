//! Introspectable schema object built from a merged document

use crate::merger::{MergeError, SchemaMerger};
use crate::printer::print_definitions;
use schemaweave_core::{Definition, MergedDocument, ObjectTypeDefinition, OperationKind};
use std::collections::HashMap;

/// A merged document with name lookups
///
/// No validation is performed; the schema is exactly the document it was
/// built from.
#[derive(Debug, Clone)]
pub struct Schema {
    document: MergedDocument,
    types: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema from a merged document
    pub fn build(document: MergedDocument) -> Self {
        let mut types = HashMap::new();
        for (i, definition) in document.definitions.iter().enumerate() {
            types.entry(definition.name().to_string()).or_insert(i);
        }

        Self { document, types }
    }

    /// The document this schema was built from
    pub fn document(&self) -> &MergedDocument {
        &self.document
    }

    /// Look up a type by name
    pub fn get_type(&self, name: &str) -> Option<&Definition> {
        self.types.get(name).map(|&i| &self.document.definitions[i])
    }

    /// Check whether a type is defined
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Type names in document order
    pub fn type_names(&self) -> Vec<&str> {
        self.document.definition_names()
    }

    /// Root operation type for a kind
    pub fn root_type(&self, kind: OperationKind) -> Option<&ObjectTypeDefinition> {
        match self.get_type(kind.type_name()) {
            Some(Definition::Object(def)) => Some(def),
            _ => None,
        }
    }

    /// Print the schema as SDL
    pub fn to_sdl(&self) -> String {
        print_definitions(&self.document.definitions)
    }

    /// Re-derive a document by printing, re-parsing and re-merging
    pub fn rederive_document(&self) -> Result<MergedDocument, MergeError> {
        let sdl = self.to_sdl();
        let outcome = SchemaMerger::new().merge_sources([("<schema>", sdl.as_str())])?;
        Ok(outcome.document)
    }
}

impl From<MergedDocument> for Schema {
    fn from(document: MergedDocument) -> Self {
        Self::build(document)
    }
}
