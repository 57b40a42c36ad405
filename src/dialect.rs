use std::fmt;
use std::str::FromStr;

use sqlparser::dialect::{dialect_from_str, Dialect, GenericDialect};

/// Answers the one question rendering asks of the target database: whether
/// CTE aliases must be wrapped in backticks instead of double quotes.
pub trait IdentifierQuoting {
    /// `true` when aliases render as `` `name` ``, `false` for `"name"`.
    fn uses_backtick_aliases(&self) -> bool;
}

/// A fixed flag, for callers that already know the quoting style.
impl IdentifierQuoting for bool {
    fn uses_backtick_aliases(&self) -> bool {
        *self
    }
}

impl<T: IdentifierQuoting + ?Sized> IdentifierQuoting for &T {
    fn uses_backtick_aliases(&self) -> bool {
        (**self).uses_backtick_aliases()
    }
}

/// SQL dialect the rendered statements are meant for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TargetDialect {
    /// `PostgreSQL`.
    #[default]
    Postgres,
    /// `DuckDB`.
    #[value(name = "duckdb")]
    DuckDb,
    /// `SQLite`.
    Sqlite,
    /// `MySQL`.
    #[value(name = "mysql")]
    MySql,
    /// `MariaDB` (`MySQL` syntax).
    #[value(name = "mariadb")]
    MariaDb,
    /// Google `BigQuery`.
    #[value(name = "bigquery")]
    BigQuery,
    /// Anything else; standard double-quoted identifiers.
    Generic,
}

impl TargetDialect {
    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            TargetDialect::Postgres => "postgres",
            TargetDialect::DuckDb => "duckdb",
            TargetDialect::Sqlite => "sqlite",
            TargetDialect::MySql => "mysql",
            TargetDialect::MariaDb => "mariadb",
            TargetDialect::BigQuery => "bigquery",
            TargetDialect::Generic => "generic",
        }
    }

    /// The `sqlparser` dialect used to extract table names from snippet bodies.
    pub fn parser_dialect(self) -> Box<dyn Dialect> {
        let name = match self {
            TargetDialect::MariaDb => "mysql",
            other => other.name(),
        };
        dialect_from_str(name).unwrap_or_else(|| Box::new(GenericDialect {}))
    }
}

impl IdentifierQuoting for TargetDialect {
    fn uses_backtick_aliases(&self) -> bool {
        matches!(
            self,
            TargetDialect::MySql | TargetDialect::MariaDb | TargetDialect::BigQuery
        )
    }
}

impl fmt::Display for TargetDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(TargetDialect::Postgres),
            "duckdb" => Ok(TargetDialect::DuckDb),
            "sqlite" => Ok(TargetDialect::Sqlite),
            "mysql" => Ok(TargetDialect::MySql),
            "mariadb" => Ok(TargetDialect::MariaDb),
            "bigquery" => Ok(TargetDialect::BigQuery),
            "generic" => Ok(TargetDialect::Generic),
            other => Err(format!("Unknown SQL dialect '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backtick_dialects_are_mysql_family_and_bigquery() {
        assert!(TargetDialect::MySql.uses_backtick_aliases());
        assert!(TargetDialect::MariaDb.uses_backtick_aliases());
        assert!(TargetDialect::BigQuery.uses_backtick_aliases());
        assert!(!TargetDialect::Postgres.uses_backtick_aliases());
        assert!(!TargetDialect::DuckDb.uses_backtick_aliases());
        assert!(!TargetDialect::Sqlite.uses_backtick_aliases());
        assert!(!TargetDialect::Generic.uses_backtick_aliases());
    }

    #[test]
    fn from_str_accepts_aliases_and_rejects_unknown() {
        assert_eq!(
            "PostgreSQL".parse::<TargetDialect>(),
            Ok(TargetDialect::Postgres)
        );
        assert_eq!(" mysql ".parse::<TargetDialect>(), Ok(TargetDialect::MySql));
        let err = "oracle".parse::<TargetDialect>().unwrap_err();
        assert_eq!(err, "Unknown SQL dialect 'oracle'");
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for dialect in [
            TargetDialect::Postgres,
            TargetDialect::DuckDb,
            TargetDialect::Sqlite,
            TargetDialect::MySql,
            TargetDialect::MariaDb,
            TargetDialect::BigQuery,
            TargetDialect::Generic,
        ] {
            assert_eq!(dialect.name().parse::<TargetDialect>(), Ok(dialect));
        }
    }

    #[test]
    fn fixed_flag_acts_as_quoting_collaborator() {
        assert!(true.uses_backtick_aliases());
        assert!(!false.uses_backtick_aliases());
    }
}
