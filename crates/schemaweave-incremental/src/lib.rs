//! Incremental schema builds
//!
//! This crate turns a set of source directories into a merged schema
//! document, skipping the parse-and-merge path when nothing changed.
//!
//! ## Architecture
//!
//! - **SourceCollector**: walks the roots and produces a [`Fingerprint`]
//!   (absolute path → modification time)
//! - **SchemaCache**: persists the fingerprint and the merged document as
//!   one logical unit and decides hit or miss
//! - **SchemaBuilder**: runs collect → lookup → merge → persist
//!
//! The whole source set is one cache unit; any added, removed or touched
//! file invalidates it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemaweave_core::Config;
//! use schemaweave_incremental::SchemaBuilder;
//!
//! let config = Config::from_file(Path::new("schemaweave.toml"))?;
//! let output = SchemaBuilder::from_config(&config).build()?;
//! println!("{} definitions ({:?})", output.document.len(), output.cache_status);
//! ```

pub mod collector;
pub mod cache;
pub mod pipeline;

pub use collector::{SourceCollector, Collection, Fingerprint, CollectError};
pub use cache::{SchemaCache, CacheLookup, MissReason, CacheError, DocumentSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use pipeline::{SchemaBuilder, BuildOutput, CacheStatus, BuildError};
