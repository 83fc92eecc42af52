//! SDL document model
//!
//! Position-free representation of parsed schema-definition documents.
//! No source positions are stored, so derived equality is structural
//! equality.

use serde::{Deserialize, Serialize};

/// Scalars every SDL document can reference without declaring them
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Check whether a name is one of the built-in scalars
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Reference to a type from a field, argument or input field
///
/// Recursive: `[String!]!` is `NonNull(List(NonNull(Named("String"))))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeReference {
    /// A named type (scalar, object, enum, ...)
    Named(String),

    /// A list of the inner type
    List(Box<TypeReference>),

    /// The inner type, non-nullable
    NonNull(Box<TypeReference>),
}

impl TypeReference {
    /// Create a named type reference
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wrap a reference in a list
    pub fn list(inner: TypeReference) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wrap a reference in a non-null marker
    pub fn non_null(inner: TypeReference) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// Name of the innermost named type, after peeling every wrapper
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }

    /// Whether the outermost reference is wrapped in a non-null marker
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }
}

impl std::fmt::Display for TypeReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{}", name),
            Self::List(inner) => write!(f, "[{}]", inner),
            Self::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// Root operation kinds, in the order merged documents list them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// All operation kinds in canonical order
    pub const ALL: [OperationKind; 3] = [Self::Query, Self::Mutation, Self::Subscription];

    /// Name of the root type for this operation kind
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }

    /// Map a type name to its operation kind, if it is a root type name
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Argument passed to a directive usage, with its value in rendered SDL form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveArgument {
    pub name: String,
    pub value: String,
}

/// A directive applied to a definition, field or value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Directive name without the leading `@`
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<DirectiveArgument>,
}

/// An argument of a field, or a field of an input object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValueDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared type
    #[serde(rename = "type")]
    pub ty: TypeReference,

    /// Default value in rendered SDL form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

impl InputValueDefinition {
    /// Create an input value with no description, default or directives
    pub fn new(name: impl Into<String>, ty: TypeReference) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            default_value: None,
            directives: Vec::new(),
        }
    }
}

/// A field of an object or interface type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<InputValueDefinition>,

    /// Declared return type
    #[serde(rename = "type")]
    pub ty: TypeReference,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

impl FieldDefinition {
    /// Create a field with no arguments, description or directives
    pub fn new(name: impl Into<String>, ty: TypeReference) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            ty,
            directives: Vec::new(),
        }
    }

    /// Add an argument
    pub fn with_argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Find an argument by name
    pub fn find_argument(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

/// `scalar Name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarTypeDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

/// `type Name implements A & B { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTypeDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Implemented interface names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    pub fields: Vec<FieldDefinition>,
}

impl ObjectTypeDefinition {
    /// Create an object type from its fields
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            description: None,
            interfaces: Vec::new(),
            directives: Vec::new(),
            fields,
        }
    }

    /// Find a field by name
    pub fn find_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// `interface Name implements A & B { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceTypeDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Implemented interface names, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    pub fields: Vec<FieldDefinition>,
}

/// `union Name = A | B`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionTypeDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    /// Member type names
    pub members: Vec<String>,
}

/// A single value of an enum type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

/// `enum Name { A B }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTypeDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    pub values: Vec<EnumValueDefinition>,
}

/// `input Name { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputObjectTypeDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    pub fields: Vec<InputValueDefinition>,
}

impl InputObjectTypeDefinition {
    /// Find an input field by name
    pub fn find_field(&self, name: &str) -> Option<&InputValueDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Definition classes; names are unique within a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionClass {
    Scalar,
    NamedType,
    InputObject,
}

impl std::fmt::Display for DefinitionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::NamedType => write!(f, "type"),
            Self::InputObject => write!(f, "input"),
        }
    }
}

/// A top-level type system definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Definition {
    Scalar(ScalarTypeDefinition),
    Object(ObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Union(UnionTypeDefinition),
    Enum(EnumTypeDefinition),
    InputObject(InputObjectTypeDefinition),
}

impl Definition {
    /// Name of the defined type
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(def) => &def.name,
            Self::Object(def) => &def.name,
            Self::Interface(def) => &def.name,
            Self::Union(def) => &def.name,
            Self::Enum(def) => &def.name,
            Self::InputObject(def) => &def.name,
        }
    }

    /// Description of the defined type, if any
    pub fn description(&self) -> Option<&str> {
        let description = match self {
            Self::Scalar(def) => &def.description,
            Self::Object(def) => &def.description,
            Self::Interface(def) => &def.description,
            Self::Union(def) => &def.description,
            Self::Enum(def) => &def.description,
            Self::InputObject(def) => &def.description,
        };
        description.as_deref()
    }

    /// Class this definition is de-duplicated within
    pub fn class(&self) -> DefinitionClass {
        match self {
            Self::Scalar(_) => DefinitionClass::Scalar,
            Self::InputObject(_) => DefinitionClass::InputObject,
            Self::Object(_) | Self::Interface(_) | Self::Union(_) | Self::Enum(_) => {
                DefinitionClass::NamedType
            }
        }
    }

    /// SDL keyword introducing this definition
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Object(_) => "type",
            Self::Interface(_) => "interface",
            Self::Union(_) => "union",
            Self::Enum(_) => "enum",
            Self::InputObject(_) => "input",
        }
    }

    /// Fields of object and interface types
    pub fn output_fields(&self) -> Option<&[FieldDefinition]> {
        match self {
            Self::Object(def) => Some(&def.fields),
            Self::Interface(def) => Some(&def.fields),
            _ => None,
        }
    }
}

/// Ordered definitions parsed from a single SDL source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub definitions: Vec<Definition>,
}

impl SchemaDocument {
    /// Create a document from definitions
    pub fn from_definitions(definitions: Vec<Definition>) -> Self {
        Self { definitions }
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the document defines nothing
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Union of all documents in a build
///
/// Definitions are ordered scalars, named types, input objects, then the
/// synthesized root types in query/mutation/subscription order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedDocument {
    pub definitions: Vec<Definition>,
}

impl MergedDocument {
    /// Create a merged document from already ordered definitions
    pub fn from_definitions(definitions: Vec<Definition>) -> Self {
        Self { definitions }
    }

    /// Find the first definition with the given name
    pub fn find(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name() == name)
    }

    /// Whether a name is a built-in scalar or a scalar declared in this document
    pub fn is_scalar(&self, name: &str) -> bool {
        is_builtin_scalar(name)
            || self
                .definitions
                .iter()
                .any(|d| matches!(d, Definition::Scalar(def) if def.name == name))
    }

    /// Root operation type for a kind, if the document has one
    pub fn root_type(&self, kind: OperationKind) -> Option<&ObjectTypeDefinition> {
        self.definitions.iter().find_map(|d| match d {
            Definition::Object(def) if def.name == kind.type_name() => Some(def),
            _ => None,
        })
    }

    /// Object types that are not root operation types
    pub fn entity_types(&self) -> impl Iterator<Item = &ObjectTypeDefinition> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Object(def) if OperationKind::from_type_name(&def.name).is_none() => {
                Some(def)
            }
            _ => None,
        })
    }

    /// Input object types
    pub fn input_types(&self) -> impl Iterator<Item = &InputObjectTypeDefinition> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::InputObject(def) => Some(def),
            _ => None,
        })
    }

    /// Definition names in document order
    pub fn definition_names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name()).collect()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the document defines nothing
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
