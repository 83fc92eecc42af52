//! Requirement analysis over a merged document
//!
//! A single pass from [`MergedDocument`] to three independent descriptor
//! collections. The document is only read.

use crate::requirements::{
    EntityRequirement, RequestRequirement, RequirementKind, RequirementSet, ResolvedType,
    ResolverKey, ResolverRequirement, TypedName,
};
use crate::type_mapper::TypeMapper;
use schemaweave_core::{
    Definition, Diagnostic, DiagnosticCode, FieldDefinition, GeneratorConfig, MergedDocument,
    OperationKind, TypeReference,
};

/// Default name of the root-type placeholder field
pub const DEFAULT_PLACEHOLDER_FIELD: &str = "_empty";

/// Derives requirement descriptors from a merged document
pub struct SchemaAnalyzer<'a> {
    document: &'a MergedDocument,
    mapper: &'a dyn TypeMapper,
    placeholder_field: String,
}

impl<'a> SchemaAnalyzer<'a> {
    /// Create an analyzer with the default placeholder field
    pub fn new(document: &'a MergedDocument, mapper: &'a dyn TypeMapper) -> Self {
        Self {
            document,
            mapper,
            placeholder_field: DEFAULT_PLACEHOLDER_FIELD.to_string(),
        }
    }

    /// Create an analyzer using `[generator]` settings
    pub fn from_config(
        document: &'a MergedDocument,
        mapper: &'a dyn TypeMapper,
        config: &GeneratorConfig,
    ) -> Self {
        Self::new(document, mapper).with_placeholder_field(config.placeholder_field.clone())
    }

    /// Set the root-type field that only exists to keep the type non-empty
    pub fn with_placeholder_field(mut self, name: impl Into<String>) -> Self {
        self.placeholder_field = name.into();
        self
    }

    /// Whether a (possibly wrapped) type is a built-in or declared scalar
    pub fn is_scalar(&self, ty: &TypeReference) -> bool {
        self.document.is_scalar(ty.base_name())
    }

    /// Resolve a type reference into a target type with per-level nullability
    ///
    /// `context` names the owner of the reference in errors.
    pub fn resolve_type(&self, ty: &TypeReference, context: &str) -> Result<ResolvedType, AnalyzeError> {
        self.resolve(ty).ok_or_else(|| AnalyzeError::InvalidTypeReference {
            location: context.to_string(),
            reference: ty.to_string(),
        })
    }

    fn resolve(&self, ty: &TypeReference) -> Option<ResolvedType> {
        match ty {
            TypeReference::NonNull(inner) => match inner.as_ref() {
                TypeReference::NonNull(_) => None,
                inner => Some(self.resolve(inner)?.with_nullable(false)),
            },
            TypeReference::List(inner) => Some(ResolvedType::List {
                element: Box::new(self.resolve(inner)?),
                nullable: true,
            }),
            TypeReference::Named(name) if name.is_empty() => None,
            TypeReference::Named(name) => Some(ResolvedType::Named {
                name: self.mapper.map_name(name),
                nullable: true,
            }),
        }
    }

    /// Run every analysis without the non-empty check
    pub fn analyze(&self) -> Result<RequirementSet, AnalyzeError> {
        let set = RequirementSet {
            resolvers: self.collect_resolvers()?,
            entities: self.collect_entities()?,
            requests: self.collect_requests()?,
        };

        tracing::debug!(
            resolvers = set.resolvers.len(),
            entities = set.entities.len(),
            requests = set.requests.len(),
            "schema analysis complete"
        );

        Ok(set)
    }

    /// Resolver requirements; an empty result is an error
    pub fn resolver_requirements(&self) -> Result<Vec<ResolverRequirement>, AnalyzeError> {
        non_empty(self.collect_resolvers()?, RequirementKind::Resolver)
    }

    /// Entity requirements; an empty result is an error
    pub fn entity_requirements(&self) -> Result<Vec<EntityRequirement>, AnalyzeError> {
        non_empty(self.collect_entities()?, RequirementKind::Entity)
    }

    /// Request requirements; an empty result is an error
    pub fn request_requirements(&self) -> Result<Vec<RequestRequirement>, AnalyzeError> {
        non_empty(self.collect_requests()?, RequirementKind::Request)
    }

    fn collect_resolvers(&self) -> Result<Vec<ResolverRequirement>, AnalyzeError> {
        let mut resolvers = Vec::new();

        for definition in &self.document.definitions {
            let Some(fields) = definition.output_fields() else {
                continue;
            };
            let owner = definition.name();
            let is_root = matches!(definition, Definition::Object(_))
                && OperationKind::from_type_name(owner).is_some();

            for field in fields {
                if is_root && field.name == self.placeholder_field {
                    continue;
                }
                if !is_root && self.is_scalar(&field.ty) {
                    continue;
                }

                resolvers.push(self.resolver_for(owner, field)?);
            }
        }

        Ok(resolvers)
    }

    fn resolver_for(&self, owner: &str, field: &FieldDefinition) -> Result<ResolverRequirement, AnalyzeError> {
        let key = ResolverKey::new(owner, &field.name);
        let context = key.to_string();

        let arguments = field
            .arguments
            .iter()
            .map(|arg| {
                let ty = self.resolve_type(&arg.ty, &format!("{}({})", context, arg.name))?;
                Ok(TypedName::new(&arg.name, ty))
            })
            .collect::<Result<Vec<_>, AnalyzeError>>()?;

        Ok(ResolverRequirement {
            return_type: self.resolve_type(&field.ty, &context)?,
            key,
            arguments,
            description: field.description.clone(),
        })
    }

    fn collect_entities(&self) -> Result<Vec<EntityRequirement>, AnalyzeError> {
        self.document
            .entity_types()
            .map(|object| {
                let fields = object
                    .fields
                    .iter()
                    .map(|field| {
                        let ty = self.resolve_type(&field.ty, &format!("{}.{}", object.name, field.name))?;
                        Ok(TypedName::new(&field.name, ty))
                    })
                    .collect::<Result<Vec<_>, AnalyzeError>>()?;

                Ok(EntityRequirement {
                    name: object.name.clone(),
                    fields,
                    description: object.description.clone(),
                })
            })
            .collect()
    }

    fn collect_requests(&self) -> Result<Vec<RequestRequirement>, AnalyzeError> {
        self.document
            .input_types()
            .map(|input| {
                let fields = input
                    .fields
                    .iter()
                    .map(|field| {
                        let ty = self.resolve_type(&field.ty, &format!("{}.{}", input.name, field.name))?;
                        Ok(TypedName::new(&field.name, ty))
                    })
                    .collect::<Result<Vec<_>, AnalyzeError>>()?;

                Ok(RequestRequirement {
                    name: input.name.clone(),
                    fields,
                    description: input.description.clone(),
                })
            })
            .collect()
    }
}

fn non_empty<T>(items: Vec<T>, kind: RequirementKind) -> Result<Vec<T>, AnalyzeError> {
    if items.is_empty() {
        tracing::warn!(%kind, "analysis produced no requirements");
        return Err(AnalyzeError::NoRequirements { kind });
    }
    Ok(items)
}

/// Analysis error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzeError {
    #[error("no {kind} requirements found in schema")]
    NoRequirements { kind: RequirementKind },

    #[error("invalid type reference '{reference}' at {location}")]
    InvalidTypeReference { location: String, reference: String },
}

impl AnalyzeError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            Self::NoRequirements { .. } => DiagnosticCode::AnalysisNoRequirements,
            Self::InvalidTypeReference { .. } => DiagnosticCode::AnalysisInvalidTypeReference,
        };
        Diagnostic::error(code, self.to_string())
    }
}
