//! Error types for SimCache

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying the cache
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The host environment failed to answer a query
    #[error("Host error: {0}")]
    Host(String),

    // =========================================================================
    // Per-Entity Errors
    // =========================================================================
    /// Entity has no usable identifier (zero or unresolvable)
    #[error("Entity has no usable identifier")]
    MissingId,

    /// Display name could not be resolved
    #[error("Name unavailable for entity {entity_id}: {reason}")]
    NameUnavailable { entity_id: u64, reason: String },

    /// Age bracket could not be resolved
    #[error("Age unavailable for entity {entity_id}: {reason}")]
    AgeUnavailable { entity_id: u64, reason: String },

    // =========================================================================
    // Query Errors
    // =========================================================================
    /// Unrecognized kind tag
    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    /// Unrecognized age bracket tag
    #[error("Unknown age bracket: {0}")]
    UnknownAgeBracket(String),

    /// Query could not be interpreted
    #[error("Invalid query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AgeUnavailable {
            entity_id: 42,
            reason: "no age".into(),
        };
        assert_eq!(err.to_string(), "Age unavailable for entity 42: no age");

        let err = Error::InvalidQuery {
            query: "bella".into(),
            reason: "not an id".into(),
        };
        assert_eq!(err.to_string(), "Invalid query 'bella': not an id");
    }
}
