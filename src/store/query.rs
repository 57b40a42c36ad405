use crate::dialect::IdentifierQuoting;
use crate::error::Result;
use crate::parser::names::quote_alias;
use crate::store::names::validate_dependency_names;
use crate::store::resolve::{remove_trailing_semicolon, resolve_dependencies};
use crate::store::SnippetStore;

/// A SQL body plus the snippet names it must be prefixed with.
///
/// The query does not know which store it belongs to; rendering takes the
/// store as an argument and looks dependencies up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableQuery {
    body: String,
    with: Vec<String>,
}

impl RenderableQuery {
    /// Create a query, rejecting dependency names that contain hyphens.
    pub fn new(body: impl Into<String>, with: Vec<String>) -> Result<Self> {
        validate_dependency_names(&with)?;
        Ok(Self {
            body: body.into(),
            with,
        })
    }

    /// The raw SQL body, as given.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Declared direct dependencies, in declaration order.
    pub fn with(&self) -> &[String] {
        &self.with
    }

    /// Render the query with every transitive dependency inlined as a CTE.
    ///
    /// Without dependencies the trimmed body is returned as is. Otherwise the
    /// result is `WITH "d1" AS (body1), "d2" AS (body2) <body>`, aliases
    /// quoted with backticks when `quoting` asks for them and each dependency
    /// body stripped of one trailing semicolon.
    pub fn render(
        &self,
        store: &SnippetStore,
        quoting: &impl IdentifierQuoting,
    ) -> Result<String> {
        let with_all = resolve_dependencies(store, &self.with)?;
        if with_all.is_empty() {
            return Ok(self.body.trim().to_string());
        }

        let backtick = quoting.uses_backtick_aliases();
        let ctes = with_all
            .iter()
            .map(|name| -> Result<String> {
                let dependency = store.get(name)?;
                Ok(format!(
                    "{} AS ({})",
                    quote_alias(name, backtick),
                    remove_trailing_semicolon(dependency.body())
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(format!("WITH {} {}", ctes.join(", "), self.body))
    }
}
