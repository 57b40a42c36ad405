//! Store named SQL snippets and compose them, with their transitive
//! dependencies, into a single CTE-prefixed statement.
#![warn(missing_docs)]

/// Target SQL dialects and the identifier-quoting question rendering asks of them.
pub mod dialect;
/// Error type shared by the store, resolver, and persistence layer.
pub mod error;
/// Snippet files on disk: saving, loading with dependency inference, deleting.
pub mod persist;
/// SQL parsing helpers: table extraction and identifier handling.
pub mod parser;
/// The snippet store, renderable queries, and dependency resolution.
pub mod store;

pub use dialect::{IdentifierQuoting, TargetDialect};
pub use error::{Result, SnippetError};
pub use store::{RenderableQuery, SnippetStore, SnippetSummary};
