use std::ops::ControlFlow;

use sqlparser::ast::visit_relations;
use sqlparser::dialect::Dialect;
use sqlparser::parser::Parser;

/// Extract the table-like names a query reads from.
///
/// Returns the terminal component of every relation (`public.docs` -> `docs`),
/// unquoted, in order of first appearance and without duplicates. SQL that
/// does not parse yields no names.
pub fn extract_tables_from_query(sql: &str, dialect: &dyn Dialect) -> Vec<String> {
    if sql.trim().is_empty() {
        return Vec::new();
    }

    let statements = match Parser::parse_sql(dialect, sql) {
        Ok(statements) => statements,
        Err(error) => {
            tracing::debug!(%error, "query did not parse, no tables extracted");
            return Vec::new();
        }
    };

    let mut tables: Vec<String> = Vec::new();
    let _ = visit_relations(&statements, |relation| {
        if let Some(ident) = relation.0.last() {
            if !tables.contains(&ident.value) {
                tables.push(ident.value.clone());
            }
        }
        ControlFlow::<()>::Continue(())
    });
    tables
}
