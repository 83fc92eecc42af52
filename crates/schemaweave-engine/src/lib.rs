//! SchemaWeave engine - Requirement analysis
//!
//! This crate derives code-generation requirements from a merged schema:
//! - Type mapping from SDL names to target type names
//! - Type reference resolution with per-level nullability
//! - Resolver, entity and request requirement descriptors
//! - The field-map contract for generated holders

pub mod type_mapper;
pub mod requirements;
pub mod analyzer;
pub mod domain;

pub use type_mapper::{TypeMapper, DefaultTypeMapper, BUILTIN_TYPE_MAP};
pub use requirements::{
    ResolvedType, TypedName, ResolverKey, ResolverRequirement, EntityRequirement,
    RequestRequirement, RequirementKind, RequirementSet,
};
pub use analyzer::{SchemaAnalyzer, AnalyzeError, DEFAULT_PLACEHOLDER_FIELD};
pub use domain::FieldMap;
