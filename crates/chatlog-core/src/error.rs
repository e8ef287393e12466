// Error types for the event store and its persistence gateways

use thiserror::Error;

/// Result type alias for event store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while mutating or persisting the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required input field was missing or empty.
    /// Surfaced to HTTP callers as 400.
    #[error("{0}")]
    Validation(String),

    /// A durable snapshot could not be read or parsed.
    /// Recovered by the loader with an empty default.
    #[error("Failed to read snapshot {path}: {reason}")]
    PersistenceRead { path: String, reason: String },

    /// A durable snapshot could not be written.
    /// Logged and swallowed by the store; memory stays authoritative.
    #[error("Failed to write snapshot {path}: {reason}")]
    PersistenceWrite { path: String, reason: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Validation error for a missing required field
    pub fn missing_field(field: &str) -> Self {
        StoreError::Validation(format!("{} is required", field))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

/// Returns the value of a required string field, rejecting absent and empty values.
pub fn require<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(StoreError::missing_field(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present() {
        let value = Some("s1".to_string());
        assert_eq!(require(&value, "sessionId").unwrap(), "s1");
    }

    #[test]
    fn test_require_missing_and_empty() {
        let err = require(&None, "sessionId").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "sessionId is required");

        let empty = Some(String::new());
        assert!(require(&empty, "sender").is_err());
    }

    #[test]
    fn test_persistence_error_display() {
        let err = StoreError::PersistenceWrite {
            path: "data/logs.json".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to write snapshot data/logs.json: permission denied"
        );
        assert!(!err.is_validation());
    }
}
