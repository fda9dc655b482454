//! Generator error types.

use cbind_core::NamingError;

/// Errors that can occur while generating bindings.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Type resolution has no entry for a foreign spelling.
    #[error("unknown foreign type '{spelling}'")]
    UnknownType { spelling: String },

    /// A parameter or return type of a symbol could not be resolved.
    #[error("cannot resolve {position} of '{symbol}': {source}")]
    UnresolvedType {
        symbol: String,
        position: String,
        #[source]
        source: Box<GenError>,
    },

    /// A naming precondition was violated.
    #[error("naming error in '{symbol}': {source}")]
    Naming {
        symbol: String,
        #[source]
        source: NamingError,
    },

    /// A template accessor was requested for a function without a receiver.
    #[error("accessor '{function}' has no receiver")]
    MissingReceiver { function: String },

    /// A template accessor was requested for a function without a struct member.
    #[error("accessor '{function}' has no struct member")]
    MissingMember { function: String },

    /// Failed to parse a declaration file.
    #[error("invalid binding declaration: {detail}")]
    InvalidDeclaration { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GenError>;
