//! Requirement descriptors
//!
//! Read-only records describing the code a schema implies: one resolver per
//! resolvable field, one data holder per entity type and one input holder
//! per input type.

use serde::{Serialize, Serializer};

/// A resolved target type with nullability at every level
///
/// Rendered in composite notation, e.g. `array<Post>|null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    Named { name: String, nullable: bool },
    List { element: Box<ResolvedType>, nullable: bool },
}

impl ResolvedType {
    /// Whether this level accepts null
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Named { nullable, .. } | Self::List { nullable, .. } => *nullable,
        }
    }

    /// Copy of this type with the outermost nullability replaced
    pub fn with_nullable(self, nullable: bool) -> Self {
        match self {
            Self::Named { name, .. } => Self::Named { name, nullable },
            Self::List { element, .. } => Self::List { element, nullable },
        }
    }

    /// Innermost target type name
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named { name, .. } => name,
            Self::List { element, .. } => element.base_name(),
        }
    }
}

impl std::fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named { name, .. } => write!(f, "{}", name)?,
            Self::List { element, .. } => write!(f, "array<{}>", element)?,
        }
        if self.is_nullable() {
            write!(f, "|null")?;
        }
        Ok(())
    }
}

impl Serialize for ResolvedType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Name paired with its resolved type (an argument or a field)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedName {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: ResolvedType,
}

impl TypedName {
    pub fn new(name: impl Into<String>, ty: ResolvedType) -> Self {
        Self { name: name.into(), ty }
    }
}

fn find<'a>(entries: &'a [TypedName], name: &str) -> Option<&'a TypedName> {
    entries.iter().find(|e| e.name == name)
}

/// Owner type and field of a resolver
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolverKey {
    pub owner: String,
    pub field: String,
}

impl ResolverKey {
    pub fn new(owner: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
        }
    }
}

impl std::fmt::Display for ResolverKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.owner, self.field)
    }
}

/// A field that needs a resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverRequirement {
    pub key: ResolverKey,

    /// Arguments in declaration order
    pub arguments: Vec<TypedName>,

    pub return_type: ResolvedType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ResolverRequirement {
    /// Owner type name
    pub fn owner(&self) -> &str {
        &self.key.owner
    }

    /// Field name
    pub fn field(&self) -> &str {
        &self.key.field
    }

    /// Find an argument by name
    pub fn find_argument(&self, name: &str) -> Option<&TypedName> {
        find(&self.arguments, name)
    }
}

/// A non-root object type that needs a data holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRequirement {
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<TypedName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntityRequirement {
    /// Find a field by name
    pub fn find_field(&self, name: &str) -> Option<&TypedName> {
        find(&self.fields, name)
    }
}

/// An input object type that needs an input holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestRequirement {
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<TypedName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RequestRequirement {
    /// Find a field by name
    pub fn find_field(&self, name: &str) -> Option<&TypedName> {
        find(&self.fields, name)
    }
}

/// Requirement kinds, named in errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    Resolver,
    Entity,
    Request,
}

impl std::fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolver => write!(f, "resolver"),
            Self::Entity => write!(f, "entity"),
            Self::Request => write!(f, "request"),
        }
    }
}

/// All descriptors produced by one analysis pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequirementSet {
    pub resolvers: Vec<ResolverRequirement>,
    pub entities: Vec<EntityRequirement>,
    pub requests: Vec<RequestRequirement>,
}

impl RequirementSet {
    /// Find a resolver by owner type and field
    pub fn find_resolver(&self, owner: &str, field: &str) -> Option<&ResolverRequirement> {
        self.resolvers
            .iter()
            .find(|r| r.key.owner == owner && r.key.field == field)
    }

    /// Find an entity by type name
    pub fn find_entity(&self, name: &str) -> Option<&EntityRequirement> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Find a request by type name
    pub fn find_request(&self, name: &str) -> Option<&RequestRequirement> {
        self.requests.iter().find(|r| r.name == name)
    }

    /// Number of descriptors of a kind
    pub fn count(&self, kind: RequirementKind) -> usize {
        match kind {
            RequirementKind::Resolver => self.resolvers.len(),
            RequirementKind::Entity => self.entities.len(),
            RequirementKind::Request => self.requests.len(),
        }
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}
