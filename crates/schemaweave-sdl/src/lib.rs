//! SDL parsing and merging
//!
//! This crate handles:
//! - Parsing schema-definition text using graphql-parser
//! - Lowering the AST into the position-free document model
//! - Merging many source files into one document with conflict detection
//! - Printing documents back to SDL
//! - Building an introspectable schema object

pub mod parser;
pub mod merger;
pub mod printer;
pub mod schema;

pub use parser::{SdlParser, ParsedSdl, ParseError, SkippedDefinition};
pub use merger::{SchemaMerger, MergeOutcome, MergeError};
pub use printer::{print_definitions, print_definition};
pub use schema::Schema;
