//! The snippet store: named SQL fragments and their dependency graph.

/// Snippet-name validation and "did you mean" suggestions.
pub mod names;
/// [`RenderableQuery`]: a body plus declared dependencies, rendered as a CTE chain.
pub mod query;
/// Dependency closure, reverse lookup, and the small pure helpers they use.
pub mod resolve;

use serde::Serialize;

use crate::dialect::TargetDialect;
use crate::error::{Result, SnippetError};
use crate::parser::tables::extract_tables_from_query;

pub use query::RenderableQuery;

/// Name and declared dependencies of a stored snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetSummary {
    /// Snippet name.
    pub name: String,
    /// Direct dependencies, in declaration order.
    pub with: Vec<String>,
}

/// Insertion-ordered mapping from snippet name to [`RenderableQuery`].
///
/// Insertion order is the order snippets are listed, inferred, and saved in.
/// Overwriting a name keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct SnippetStore {
    entries: Vec<(String, RenderableQuery)>,
    dialect: TargetDialect,
}

impl SnippetStore {
    /// Create an empty store that parses snippet bodies as `PostgreSQL`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store for the given target dialect.
    pub fn with_dialect(dialect: TargetDialect) -> Self {
        Self {
            entries: Vec::new(),
            dialect,
        }
    }

    /// The dialect used for parsing bodies; also a valid quoting collaborator.
    pub fn dialect(&self) -> TargetDialect {
        self.dialect
    }

    /// Look up a snippet.
    ///
    /// Fails with [`SnippetError::NotFound`] on an empty store and with
    /// [`SnippetError::UnknownIdentifier`] (carrying a suggestion or the valid
    /// names) when `name` is absent.
    pub fn get(&self, name: &str) -> Result<&RenderableQuery> {
        self.position(name).map(|idx| &self.entries[idx].1)
    }

    /// Insert or replace an entry without any validation.
    pub fn set(&mut self, name: impl Into<String>, value: RenderableQuery) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove an entry, returning it. Lookup errors are the same as [`Self::get`].
    pub fn delete(&mut self, name: &str) -> Result<RenderableQuery> {
        let idx = self.position(name)?;
        Ok(self.entries.remove(idx).1)
    }

    /// Stored names, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// `(name, query)` pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RenderableQuery)> + '_ {
        self.entries.iter().map(|(key, query)| (key.as_str(), query))
    }

    /// Number of stored snippets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `name` is stored.
    pub fn contains(&self, name: &str) -> bool {
        self.keys().any(|key| key == name)
    }

    /// Validate and store a snippet, silently replacing any previous entry.
    pub fn store(
        &mut self,
        name: &str,
        query: impl Into<String>,
        with: Option<Vec<String>>,
    ) -> Result<()> {
        names::validate_snippet_name(name)?;
        let with = with.unwrap_or_default();
        if with.iter().any(|dep| dep == name) {
            return Err(SnippetError::SelfDependency {
                name: name.to_string(),
            });
        }

        let query = RenderableQuery::new(query, with)?;
        tracing::debug!(snippet = name, with = ?query.with(), "stored snippet");
        self.set(name, query);
        Ok(())
    }

    /// Stored names (other than `excluding`) that `query` reads from, in
    /// store order.
    pub fn infer_dependencies(&self, query: &str, excluding: Option<&str>) -> Vec<String> {
        let candidates: Vec<&str> = self
            .keys()
            .filter(|key| Some(*key) != excluding)
            .collect();
        if candidates.is_empty() || query.trim().is_empty() {
            return Vec::new();
        }

        let tables = extract_tables_from_query(query, self.dialect.parser_dialect().as_ref());
        let inferred: Vec<String> = candidates
            .into_iter()
            .filter(|key| tables.iter().any(|table| table == *key))
            .map(str::to_string)
            .collect();
        tracing::debug!(?tables, ?inferred, "inferred snippet dependencies");
        inferred
    }

    /// Wrap a query in a [`RenderableQuery`] without storing it.
    pub fn render(
        &self,
        query: impl Into<String>,
        with: Option<Vec<String>>,
    ) -> Result<RenderableQuery> {
        RenderableQuery::new(query, with.unwrap_or_default())
    }

    /// Every stored name that transitively depends on `name`.
    pub fn dependents_for(&self, name: &str) -> Result<Vec<String>> {
        resolve::dependents_for(self, name)
    }

    /// Stored names that reach `name` through declared dependencies. Cycles
    /// and dangling dependencies elsewhere in the store are tolerated.
    pub fn reachable_dependents(&self, name: &str) -> Vec<String> {
        resolve::reachable_dependents(self, name)
    }

    /// Names and declared dependencies of all stored snippets.
    pub fn summaries(&self) -> Vec<SnippetSummary> {
        self.iter()
            .map(|(name, query)| SnippetSummary {
                name: name.to_string(),
                with: query.with().to_vec(),
            })
            .collect()
    }

    fn position(&self, name: &str) -> Result<usize> {
        if self.entries.is_empty() {
            return Err(SnippetError::NotFound);
        }
        self.entries
            .iter()
            .position(|(key, _)| key == name)
            .ok_or_else(|| names::unknown_identifier(name, self.keys()))
    }
}
