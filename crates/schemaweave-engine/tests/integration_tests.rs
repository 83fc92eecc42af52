//! Integration tests for requirement analysis

use pretty_assertions::assert_eq;
use schemaweave_core::MergedDocument;
use schemaweave_engine::{
    DefaultTypeMapper, FieldMap, RequirementKind, SchemaAnalyzer, AnalyzeError,
};
use schemaweave_sdl::{Schema, SchemaMerger};

fn merge(sources: &[(&str, &str)]) -> MergedDocument {
    SchemaMerger::new()
        .merge_sources(sources.iter().copied())
        .unwrap()
        .document
}

#[test]
fn test_scalar_fields_on_entities_are_not_resolvers() {
    let document = merge(&[
        ("query.graphql", "type Query { user(id: ID!): User }"),
        ("user.graphql", "type User { id: ID! name: String! }"),
    ]);
    let mapper = DefaultTypeMapper::new();
    let resolvers = SchemaAnalyzer::new(&document, &mapper)
        .resolver_requirements()
        .unwrap();

    assert_eq!(resolvers.len(), 1);
    let user = &resolvers[0];
    assert_eq!(user.key.to_string(), "Query.user");
    assert_eq!(user.find_argument("id").unwrap().ty.to_string(), "string");
    assert_eq!(user.return_type.to_string(), "User|null");
    assert!(user.return_type.is_nullable());
}

#[test]
fn test_root_fields_are_always_resolvers() {
    let document = merge(&[(
        "schema.graphql",
        r#"
        type Query {
          _empty: String
          version: String!
          "Every tag in use"
          tags(prefix: String): [String!]
        }
        type Mutation { register(email: String!): Boolean }
        "#,
    )]);
    let mapper = DefaultTypeMapper::new();
    let resolvers = SchemaAnalyzer::new(&document, &mapper)
        .resolver_requirements()
        .unwrap();

    let keys: Vec<String> = resolvers.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(keys, vec!["Query.version", "Query.tags", "Mutation.register"]);

    let tags = &resolvers[1];
    assert_eq!(tags.return_type.to_string(), "array<string>|null");
    assert_eq!(tags.find_argument("prefix").unwrap().ty.to_string(), "string|null");
    assert_eq!(tags.description.as_deref(), Some("Every tag in use"));
}

#[test]
fn test_interface_fields_follow_entity_rules() {
    let document = merge(&[(
        "schema.graphql",
        "interface Node { id: ID! owner: User }\ntype User { id: ID! }",
    )]);
    let mapper = DefaultTypeMapper::new();
    let resolvers = SchemaAnalyzer::new(&document, &mapper)
        .resolver_requirements()
        .unwrap();

    let keys: Vec<String> = resolvers.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(keys, vec!["Node.owner"]);
}

#[test]
fn test_entities_and_requests() {
    let document = merge(&[
        (
            "user.graphql",
            "\"A person\" type User { id: ID! friends: [User] score: Float }\ntype Query { me: User }",
        ),
        ("input.graphql", "input NewUser { email: String! tags: [String!]! }"),
    ]);
    let mapper = DefaultTypeMapper::new();
    let analyzer = SchemaAnalyzer::new(&document, &mapper);

    let entities = analyzer.entity_requirements().unwrap();
    assert_eq!(entities.len(), 1);
    let user = &entities[0];
    assert_eq!(user.name, "User");
    assert_eq!(user.description.as_deref(), Some("A person"));
    assert_eq!(user.find_field("id").unwrap().ty.to_string(), "string");
    assert_eq!(user.find_field("friends").unwrap().ty.to_string(), "array<User|null>|null");
    assert_eq!(user.find_field("score").unwrap().ty.to_string(), "float|null");

    let requests = analyzer.request_requirements().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].find_field("tags").unwrap().ty.to_string(), "array<string>");

    let value = requests[0].to_value();
    assert_eq!(value["fields"]["email"], "string");
}

#[test]
fn test_missing_kinds_name_the_kind() {
    let document = merge(&[("query.graphql", "type Query { ping: String }")]);
    let mapper = DefaultTypeMapper::new();
    let analyzer = SchemaAnalyzer::new(&document, &mapper);

    assert_eq!(analyzer.resolver_requirements().unwrap().len(), 1);
    match analyzer.entity_requirements() {
        Err(AnalyzeError::NoRequirements { kind }) => assert_eq!(kind, RequirementKind::Entity),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(analyzer
        .request_requirements()
        .unwrap_err()
        .to_string()
        .contains("request"));
}

#[test]
fn test_type_mapping_overrides_reach_descriptors() {
    let document = merge(&[(
        "schema.graphql",
        "scalar DateTime\ntype Event { at: DateTime! }\ntype Query { events(after: DateTime): [Event!]! }",
    )]);
    let mapper = DefaultTypeMapper::with_overrides(
        [("DateTime".to_string(), "string".to_string())].into_iter().collect(),
    );
    let set = SchemaAnalyzer::new(&document, &mapper).analyze().unwrap();

    let events = set.find_resolver("Query", "events").unwrap();
    assert_eq!(events.find_argument("after").unwrap().ty.to_string(), "string|null");
    assert_eq!(events.return_type.to_string(), "array<Event>");
    assert!(set.find_resolver("Event", "at").is_none());
    assert_eq!(
        set.find_entity("Event").unwrap().find_field("at").unwrap().ty.to_string(),
        "string"
    );
}

#[test]
fn test_rederived_document_yields_identical_requirements() {
    let document = merge(&[
        (
            "users.graphql",
            r#"
            scalar DateTime
            "Someone with an account"
            type User { id: ID! joined: DateTime posts(first: Int = 10): [Post!]! }
            type Query { _empty: String user(id: ID!): User }
            "#,
        ),
        (
            "posts.graphql",
            r#"
            type Post { id: ID! author: User! }
            input NewPost { title: String! tags: [String!] }
            type Mutation { createPost(input: NewPost!): Post }
            "#,
        ),
    ]);
    let mapper = DefaultTypeMapper::new();
    let direct = SchemaAnalyzer::new(&document, &mapper).analyze().unwrap();

    let rederived = Schema::build(document.clone()).rederive_document().unwrap();
    let via_schema = SchemaAnalyzer::new(&rederived, &mapper).analyze().unwrap();

    assert_eq!(direct, via_schema);
    assert_eq!(direct.count(RequirementKind::Resolver), 4);
    assert_eq!(direct.count(RequirementKind::Entity), 2);
    assert_eq!(direct.count(RequirementKind::Request), 1);
}
