//! SchemaWeave Core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use schema::{
    TypeReference, OperationKind, Definition, DefinitionClass, SchemaDocument, MergedDocument,
    ScalarTypeDefinition, ObjectTypeDefinition, InterfaceTypeDefinition, UnionTypeDefinition,
    EnumTypeDefinition, EnumValueDefinition, InputObjectTypeDefinition, FieldDefinition,
    InputValueDefinition, Directive, DirectiveArgument, BUILTIN_SCALARS, is_builtin_scalar,
};
pub use config::{Config, ConfigError, SourceConfig, CacheConfig, GeneratorConfig};
