use std::path::PathBuf;

/// Errors raised by the snippet store, its resolver, and the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum SnippetError {
    /// A lookup was attempted on a store with no entries.
    #[error("No saved SQL")]
    NotFound,

    /// The requested name is not stored. `hint` is either a
    /// `Did you mean "..."?` suggestion or the list of valid identifiers.
    #[error("\"{name}\" is not a valid snippet identifier. {hint}")]
    UnknownIdentifier {
        /// The name that was looked up.
        name: String,
        /// Human-readable recovery hint.
        hint: String,
    },

    /// A snippet or dependency name contains a disallowed character.
    #[error("{message}")]
    InvalidIdentifier {
        /// The offending identifier (or identifiers, comma separated).
        identifier: String,
        /// Full message including the corrected identifier.
        message: String,
    },

    /// A snippet lists itself in its own `with` argument.
    #[error("Snippet name \"{name}\" cannot appear in its own with argument")]
    SelfDependency {
        /// The snippet name.
        name: String,
    },

    /// Dependency expansion reached a name already on the current path.
    #[error("Cyclic snippet dependency: {}", .path.join(" -> "))]
    CyclicDependency {
        /// Names along the cycle, starting and ending with the repeated name.
        path: Vec<String>,
    },

    /// A snippet file name cannot be used as a snippet identifier.
    #[error("Invalid snippet file name '{name}': {reason}")]
    InvalidFileName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Reading or writing a snippet file failed.
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl SnippetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnippetError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SnippetError>;
