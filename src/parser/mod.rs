/// Identifier normalization helpers (schema-qualified names, quoted identifiers).
pub mod names;
/// Table-reference extraction from raw SQL, built on `sqlparser`'s AST visitor.
pub mod tables;
