//! Naming errors.

/// Errors raised by the identifier normalizer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// A receiver name was requested for a type name without capital letters.
    #[error("cannot derive a receiver name from '{type_name}': no capitalized segments")]
    NoCapitalSegments { type_name: String },
}

/// Result type alias for naming operations.
pub type Result<T> = std::result::Result<T, NamingError>;
