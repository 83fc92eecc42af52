//! SDL parsing using graphql-parser
//!
//! Parses schema-definition text and lowers the AST into the position-free
//! document model from `schemaweave-core`.

use graphql_parser::schema::{self as ast, parse_schema};
use graphql_parser::Pos;
use schemaweave_core::{
    Definition, Diagnostic, DiagnosticCode, Directive, DirectiveArgument, EnumTypeDefinition,
    EnumValueDefinition, FieldDefinition, InputObjectTypeDefinition, InputValueDefinition,
    InterfaceTypeDefinition, Location, ObjectTypeDefinition, ScalarTypeDefinition, SchemaDocument,
    Severity, TypeReference, UnionTypeDefinition,
};
use std::path::{Path, PathBuf};

/// SDL parser producing [`SchemaDocument`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SdlParser;

impl SdlParser {
    /// Create a new SDL parser
    pub fn new() -> Self {
        Self
    }

    /// Parse SDL text into a document
    ///
    /// Returns ParsedSdl on success, or ParseError with diagnostic on failure.
    pub fn parse(&self, sdl: &str, file_path: Option<&Path>) -> Result<ParsedSdl, ParseError> {
        let document = parse_schema::<String>(sdl).map_err(|e| {
            let message = e.to_string();
            ParseError {
                position: error_position(&message),
                message,
                file_path: file_path.map(|p| p.to_path_buf()),
            }
        })?;

        let mut definitions = Vec::new();
        let mut skipped = Vec::new();

        for definition in &document.definitions {
            match definition {
                ast::Definition::TypeDefinition(def) => definitions.push(lower_type_definition(def)),
                ast::Definition::SchemaDefinition(def) => {
                    skipped.push(SkippedDefinition::new("schema", None, def.position));
                }
                ast::Definition::TypeExtension(ext) => {
                    let (name, position) = extension_name(ext);
                    skipped.push(SkippedDefinition::new("extend", Some(name), position));
                }
                ast::Definition::DirectiveDefinition(def) => {
                    skipped.push(SkippedDefinition::new(
                        "directive",
                        Some(format!("@{}", def.name)),
                        def.position,
                    ));
                }
            }
        }

        Ok(ParsedSdl {
            document: SchemaDocument::from_definitions(definitions),
            skipped,
            file_path: file_path.map(|p| p.to_path_buf()),
        })
    }

    /// Parse SDL from a file
    pub fn parse_file(&self, path: &Path) -> Result<ParsedSdl, ParseError> {
        let sdl = std::fs::read_to_string(path).map_err(|e| ParseError {
            message: format!("Failed to read file: {}", e),
            position: None,
            file_path: Some(path.to_path_buf()),
        })?;

        self.parse(&sdl, Some(path))
    }
}

/// A top-level definition outside the mergeable buckets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDefinition {
    /// Introducing keyword (`schema`, `extend`, `directive`)
    pub keyword: &'static str,

    /// Name of the skipped definition, when it has one
    pub name: Option<String>,

    pub line: usize,
    pub column: usize,
}

impl SkippedDefinition {
    fn new(keyword: &'static str, name: Option<String>, position: Pos) -> Self {
        Self {
            keyword,
            name,
            line: position.line,
            column: position.column,
        }
    }

    /// Human-readable label such as `extend User`
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {}", self.keyword, name),
            None => self.keyword.to_string(),
        }
    }
}

/// Successfully parsed SDL
#[derive(Debug, Clone)]
pub struct ParsedSdl {
    /// Lowered type definitions in source order
    pub document: SchemaDocument,

    /// Definitions that were recognized but not lowered
    pub skipped: Vec<SkippedDefinition>,

    /// Source file path (if parsed from file)
    pub file_path: Option<PathBuf>,
}

impl ParsedSdl {
    /// Count the number of lowered definitions
    pub fn definition_count(&self) -> usize {
        self.document.len()
    }

    /// Warnings for every skipped definition
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let file = self
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<input>".to_string());

        self.skipped
            .iter()
            .map(|skipped| {
                Diagnostic::warn(
                    DiagnosticCode::SdlDefinitionSkipped,
                    format!("`{}` is not merged and was skipped", skipped.label()),
                )
                .with_location(Location::with_position(
                    file.clone(),
                    skipped.line,
                    skipped.column,
                ))
            })
            .collect()
    }
}

/// SDL parsing error with diagnostic information
#[derive(Debug)]
pub struct ParseError {
    /// Error message from graphql-parser (or the I/O layer)
    pub message: String,

    /// Line and column of the failure, when the parser reported one
    pub position: Option<(usize, usize)>,

    /// Source file path
    pub file_path: Option<PathBuf>,
}

impl ParseError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::new(
            DiagnosticCode::SdlParseError,
            Severity::Error,
            format!("Failed to parse SDL: {}", self.message),
        );

        if let Some(path) = &self.file_path {
            let file = path.display().to_string();
            let location = match self.position {
                Some((line, column)) => Location::with_position(file, line, column),
                None => Location::new(file),
            };
            diag = diag.with_location(location);
        }

        diag
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file_path {
            Some(path) => write!(f, "SDL parse error in {}: {}", path.display(), self.message),
            None => write!(f, "SDL parse error: {}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Pull `line:column` out of a message containing `at 3:14`
fn error_position(message: &str) -> Option<(usize, usize)> {
    let rest = &message[message.find(" at ")? + 4..];
    let token = rest.split_whitespace().next()?;
    let (line, column) = token.split_once(':')?;
    Some((line.parse().ok()?, column.parse().ok()?))
}

fn extension_name(ext: &ast::TypeExtension<'_, String>) -> (String, Pos) {
    match ext {
        ast::TypeExtension::Scalar(e) => (e.name.clone(), e.position),
        ast::TypeExtension::Object(e) => (e.name.clone(), e.position),
        ast::TypeExtension::Interface(e) => (e.name.clone(), e.position),
        ast::TypeExtension::Union(e) => (e.name.clone(), e.position),
        ast::TypeExtension::Enum(e) => (e.name.clone(), e.position),
        ast::TypeExtension::InputObject(e) => (e.name.clone(), e.position),
    }
}

fn lower_type_definition(def: &ast::TypeDefinition<'_, String>) -> Definition {
    match def {
        ast::TypeDefinition::Scalar(t) => Definition::Scalar(ScalarTypeDefinition {
            name: t.name.clone(),
            description: t.description.clone(),
            directives: lower_directives(&t.directives),
        }),
        ast::TypeDefinition::Object(t) => Definition::Object(ObjectTypeDefinition {
            name: t.name.clone(),
            description: t.description.clone(),
            interfaces: t.implements_interfaces.clone(),
            directives: lower_directives(&t.directives),
            fields: t.fields.iter().map(lower_field).collect(),
        }),
        ast::TypeDefinition::Interface(t) => Definition::Interface(InterfaceTypeDefinition {
            name: t.name.clone(),
            description: t.description.clone(),
            interfaces: t.implements_interfaces.clone(),
            directives: lower_directives(&t.directives),
            fields: t.fields.iter().map(lower_field).collect(),
        }),
        ast::TypeDefinition::Union(t) => Definition::Union(UnionTypeDefinition {
            name: t.name.clone(),
            description: t.description.clone(),
            directives: lower_directives(&t.directives),
            members: t.types.clone(),
        }),
        ast::TypeDefinition::Enum(t) => Definition::Enum(EnumTypeDefinition {
            name: t.name.clone(),
            description: t.description.clone(),
            directives: lower_directives(&t.directives),
            values: t
                .values
                .iter()
                .map(|v| EnumValueDefinition {
                    name: v.name.clone(),
                    description: v.description.clone(),
                    directives: lower_directives(&v.directives),
                })
                .collect(),
        }),
        ast::TypeDefinition::InputObject(t) => Definition::InputObject(InputObjectTypeDefinition {
            name: t.name.clone(),
            description: t.description.clone(),
            directives: lower_directives(&t.directives),
            fields: t.fields.iter().map(lower_input_value).collect(),
        }),
    }
}

fn lower_field(field: &ast::Field<'_, String>) -> FieldDefinition {
    FieldDefinition {
        name: field.name.clone(),
        description: field.description.clone(),
        arguments: field.arguments.iter().map(lower_input_value).collect(),
        ty: lower_type(&field.field_type),
        directives: lower_directives(&field.directives),
    }
}

fn lower_input_value(value: &ast::InputValue<'_, String>) -> InputValueDefinition {
    InputValueDefinition {
        name: value.name.clone(),
        description: value.description.clone(),
        ty: lower_type(&value.value_type),
        default_value: value.default_value.as_ref().map(render_value),
        directives: lower_directives(&value.directives),
    }
}

fn lower_type(ty: &ast::Type<'_, String>) -> TypeReference {
    match ty {
        ast::Type::NamedType(name) => TypeReference::named(name.clone()),
        ast::Type::ListType(inner) => TypeReference::list(lower_type(inner)),
        ast::Type::NonNullType(inner) => TypeReference::non_null(lower_type(inner)),
    }
}

fn lower_directives(directives: &[ast::Directive<'_, String>]) -> Vec<Directive> {
    directives
        .iter()
        .map(|d| Directive {
            name: d.name.clone(),
            arguments: d
                .arguments
                .iter()
                .map(|(name, value)| DirectiveArgument {
                    name: name.clone(),
                    value: render_value(value),
                })
                .collect(),
        })
        .collect()
}

/// Render a constant value in SDL syntax
fn render_value(value: &ast::Value<'_, String>) -> String {
    match value {
        ast::Value::Variable(name) => format!("${}", name),
        ast::Value::Int(n) => n.as_i64().map(|v| v.to_string()).unwrap_or_default(),
        // Debug keeps the decimal point so the value re-parses as a float
        ast::Value::Float(f) => format!("{:?}", f),
        ast::Value::String(s) => quote_string(s),
        ast::Value::Boolean(b) => b.to_string(),
        ast::Value::Null => "null".to_string(),
        ast::Value::Enum(name) => name.clone(),
        ast::Value::List(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(", "))
        }
        ast::Value::Object(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, value)| format!("{}: {}", name, render_value(value)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

/// Quote and escape a string as an SDL string literal
pub(crate) fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaweave_core::DefinitionClass;

    #[test]
    fn parse_object_type() {
        let parser = SdlParser::new();
        let sdl = r#"
            "A registered account"
            type User implements Node @key(fields: "id") {
              id: ID!
              posts(first: Int = 10, tags: [String!]): [Post!]!
            }
        "#;

        let parsed = parser.parse(sdl, None).unwrap();
        assert_eq!(parsed.definition_count(), 1);

        let Definition::Object(user) = &parsed.document.definitions[0] else {
            panic!("expected object type");
        };
        assert_eq!(user.name, "User");
        assert_eq!(user.description.as_deref(), Some("A registered account"));
        assert_eq!(user.interfaces, vec!["Node".to_string()]);
        assert_eq!(user.directives[0].arguments[0].value, "\"id\"");

        let posts = user.find_field("posts").unwrap();
        assert_eq!(posts.ty.to_string(), "[Post!]!");
        assert_eq!(posts.find_argument("first").unwrap().default_value.as_deref(), Some("10"));
        assert_eq!(posts.find_argument("tags").unwrap().ty.to_string(), "[String!]");
    }

    #[test]
    fn parse_every_definition_class() {
        let parser = SdlParser::new();
        let sdl = r#"
            scalar DateTime
            interface Node { id: ID! }
            union SearchResult = User | Post
            enum Role { ADMIN MEMBER }
            input NewUser { email: String! role: Role = MEMBER }
        "#;

        let parsed = parser.parse(sdl, None).unwrap();
        let classes: Vec<DefinitionClass> =
            parsed.document.definitions.iter().map(|d| d.class()).collect();
        assert_eq!(
            classes,
            vec![
                DefinitionClass::Scalar,
                DefinitionClass::NamedType,
                DefinitionClass::NamedType,
                DefinitionClass::NamedType,
                DefinitionClass::InputObject,
            ]
        );
    }

    #[test]
    fn skipped_definitions_are_reported() {
        let parser = SdlParser::new();
        let sdl = "schema { query: Query }\nextend type User { age: Int }\ntype Query { ok: Boolean }\n";

        let parsed = parser.parse(sdl, Some(Path::new("schema/root.graphql"))).unwrap();
        assert_eq!(parsed.definition_count(), 1);
        assert_eq!(parsed.skipped.len(), 2);
        assert_eq!(parsed.skipped[1].label(), "extend User");

        let diagnostics = parsed.diagnostics();
        assert_eq!(diagnostics[0].code, DiagnosticCode::SdlDefinitionSkipped);
        assert_eq!(diagnostics[0].severity, Severity::Warn);
        assert_eq!(
            diagnostics[0].location.as_ref().map(|l| l.file.as_str()),
            Some("schema/root.graphql")
        );
    }

    #[test]
    fn parse_invalid_sdl() {
        let parser = SdlParser::new();
        let result = parser.parse("type User { id: }", Some(Path::new("broken.graphql")));
        assert!(result.is_err());

        let error = result.unwrap_err();
        assert!(error.to_string().contains("broken.graphql"));

        let diag = error.to_diagnostic();
        assert_eq!(diag.code, DiagnosticCode::SdlParseError);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.location.map(|l| l.file), Some("broken.graphql".to_string()));
    }

    #[test]
    fn parse_missing_file() {
        let parser = SdlParser::new();
        let error = parser.parse_file(Path::new("does/not/exist.graphql")).unwrap_err();
        assert!(error.message.contains("Failed to read file"));
    }

    #[test]
    fn error_position_extraction() {
        assert_eq!(error_position("Parse error at 3:14\nUnexpected `}`"), Some((3, 14)));
        assert_eq!(error_position("no position here"), None);
    }

    #[test]
    fn values_render_as_sdl() {
        let parser = SdlParser::new();
        let sdl = r#"
            input Filter {
              ratio: Float = 1.0
              label: String = "say \"hi\""
              ids: [Int] = [1, 2]
              nested: Filter = {limit: 5, order: ASC}
              maybe: Int = null
            }
        "#;

        let parsed = parser.parse(sdl, None).unwrap();
        let Definition::InputObject(filter) = &parsed.document.definitions[0] else {
            panic!("expected input type");
        };
        let default = |name: &str| filter.find_field(name).unwrap().default_value.clone().unwrap();

        assert_eq!(default("ratio"), "1.0");
        assert_eq!(default("label"), "\"say \\\"hi\\\"\"");
        assert_eq!(default("ids"), "[1, 2]");
        assert_eq!(default("nested"), "{limit: 5, order: ASC}");
        assert_eq!(default("maybe"), "null");
    }
}
