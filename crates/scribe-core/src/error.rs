use thiserror::Error;

/// Top-level error type for the Scribe system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for ScribeError` so that the `?` operator works
/// across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capability error: {0}")]
    Capability(String),

    #[error("Dictation error: {0}")]
    Dictation(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ScribeError {
    fn from(err: toml::de::Error) -> Self {
        ScribeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ScribeError {
    fn from(err: toml::ser::Error) -> Self {
        ScribeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ScribeError {
    fn from(err: serde_json::Error) -> Self {
        ScribeError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Scribe operations.
pub type Result<T> = std::result::Result<T, ScribeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScribeError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(ScribeError, &str)> = vec![
            (
                ScribeError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                ScribeError::Capability("no recognizer".to_string()),
                "Capability error: no recognizer",
            ),
            (
                ScribeError::Dictation("invalid state".to_string()),
                "Dictation error: invalid state",
            ),
            (
                ScribeError::Editor("blank document".to_string()),
                "Editor error: blank document",
            ),
            (
                ScribeError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let scribe_err: ScribeError = io_err.into();
        assert!(matches!(scribe_err, ScribeError::Io(_)));
        assert!(scribe_err.to_string().starts_with("I/O error:"));
        assert!(scribe_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let scribe_err: ScribeError = err.unwrap_err().into();
        assert!(matches!(scribe_err, ScribeError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let scribe_err: ScribeError = err.unwrap_err().into();
        assert!(matches!(scribe_err, ScribeError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(format!("value={}", value))
        }

        assert_eq!(inner().unwrap(), "value=42");
    }
}
