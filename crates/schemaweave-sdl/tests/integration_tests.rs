//! Integration tests for SDL merging

use pretty_assertions::assert_eq;
use schemaweave_core::{Definition, DiagnosticCode, OperationKind};
use schemaweave_sdl::{MergeError, Schema, SchemaMerger};
use std::path::{Path, PathBuf};

fn write(dir: &Path, name: &str, sdl: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sdl).unwrap();
    path
}

#[test]
fn test_merge_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.graphql", "type User { id: ID! }\ntype Query { me: User }");
    let b = write(dir.path(), "b.graphql", "scalar DateTime\ninput Login { email: String! }");

    let merger = SchemaMerger::new();
    let once = merger.merge_files(&[&a, &b]).unwrap();
    let twice = merger.merge_files(&[&a, &b, &a]).unwrap();

    assert_eq!(once.document, twice.document);
}

#[test]
fn test_conflicting_money_types_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.graphql", "type Money { amount: Int! currency: String! }");
    let b = write(dir.path(), "b.graphql", "type Money { amount: Int! }");

    let err = SchemaMerger::new().merge_files(&[&a, &b]).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Money"));
    assert!(message.contains("a.graphql"));
    assert!(message.contains("b.graphql"));
    assert_eq!(err.to_diagnostic().code, DiagnosticCode::MergeDefinitionConflict);
}

#[test]
fn test_identical_money_types_merge() {
    let dir = tempfile::tempdir().unwrap();
    let sdl = "type Money { amount: Int! currency: String! }";
    let a = write(dir.path(), "a.graphql", sdl);
    let b = write(dir.path(), "b.graphql", sdl);

    let outcome = SchemaMerger::new().merge_files(&[&a, &b]).unwrap();
    assert_eq!(outcome.document.definition_names(), vec!["Money"]);
}

#[test]
fn test_mutation_fields_union_across_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.graphql", "type Mutation { register(email: String!): String }");
    let b = write(dir.path(), "b.graphql", "type Mutation { sendMagicLink(email: String!): String }");

    let outcome = SchemaMerger::new().merge_files(&[&a, &b]).unwrap();
    let mutation = outcome.document.root_type(OperationKind::Mutation).unwrap();

    assert_eq!(mutation.field_names(), vec!["register", "sendMagicLink"]);
}

#[test]
fn test_parse_failure_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.graphql", "type User { id: ID! }");
    let bad = write(dir.path(), "bad.graphql", "type Broken {");

    let err = SchemaMerger::new().merge_files(&[&good, &bad]).unwrap_err();

    assert!(matches!(err, MergeError::Parse(_)));
    assert!(err.to_string().contains("bad.graphql"));

    let diag = err.to_diagnostic();
    assert_eq!(diag.code, DiagnosticCode::SdlParseError);
    assert!(diag.location.unwrap().file.ends_with("bad.graphql"));
}

#[test]
fn test_unreadable_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.graphql");

    let err = SchemaMerger::new().merge_files(&[&missing]).unwrap_err();
    assert!(matches!(err, MergeError::Read { .. }));
    assert_eq!(err.to_diagnostic().code, DiagnosticCode::SourceFileUnreadable);
}

#[test]
fn test_empty_file_list_is_fatal() {
    let files: Vec<PathBuf> = Vec::new();
    let err = SchemaMerger::new().merge_files(&files).unwrap_err();

    assert!(matches!(err, MergeError::NoFiles));
    assert_eq!(err.to_diagnostic().code, DiagnosticCode::SourceFilesMissing);
}

#[test]
fn test_schema_object_round_trips_merged_files() {
    let dir = tempfile::tempdir().unwrap();
    let users = write(
        dir.path(),
        "users.graphql",
        r#"
        scalar DateTime

        "Someone with an account"
        type User {
          id: ID!
          email: String!
          joinedAt: DateTime
          posts(first: Int = 10): [Post!]!
        }

        type Query {
          _empty: String
          user(id: ID!): User
        }
        "#,
    );
    let posts = write(
        dir.path(),
        "posts.graphql",
        r#"
        type Post {
          id: ID!
          author: User!
        }

        input NewPost {
          title: String!
          tags: [String!]
        }

        type Mutation {
          createPost(input: NewPost!): Post
        }
        "#,
    );

    let outcome = SchemaMerger::new().merge_files(&[&users, &posts]).unwrap();
    let schema = Schema::build(outcome.document.clone());

    let sdl = schema.to_sdl();
    assert!(sdl.contains("type Mutation {\n  createPost(input: NewPost!): Post\n}"));

    assert_eq!(schema.rederive_document().unwrap(), outcome.document);
}

#[test]
fn test_interface_hierarchy_survives_rederive() {
    let outcome = SchemaMerger::new()
        .merge_sources([
            ("named.graphql", "interface Named { name: String }"),
            ("node.graphql", "interface Node implements Named { id: ID! name: String }"),
            ("user.graphql", "type User implements Node & Named { id: ID! name: String }"),
        ])
        .unwrap();
    let schema = Schema::build(outcome.document.clone());

    match schema.get_type("Node") {
        Some(Definition::Interface(node)) => assert_eq!(node.interfaces, vec!["Named"]),
        other => panic!("unexpected definition: {:?}", other),
    }
    assert!(schema.to_sdl().contains("interface Node implements Named {"));
    assert_eq!(schema.rederive_document().unwrap(), outcome.document);
}
