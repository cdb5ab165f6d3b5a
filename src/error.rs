use crate::dom::NodeId;
use thiserror::Error;

/// Errors raised while selecting recipes, walking documents or driving the browser
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No catalog rule matched the current document and path
    #[error("No recipe matches path '{path}'")]
    NoMatchingRecipe { path: String },

    /// A recipe node broke an engine contract (e.g. clickable without a name)
    #[error("Recipe contract violated: {0}")]
    ContractViolation(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Unknown node handle {0}")]
    UnknownNode(NodeId),

    #[error("Document operation failed: {0}")]
    DocumentFailed(String),

    #[error("Invalid recipe configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExtractError::NoMatchingRecipe { path: "/cart".to_string() };
        assert_eq!(err.to_string(), "No recipe matches path '/cart'");

        let err = ExtractError::InvalidSelector {
            selector: "a:hover".to_string(),
            reason: "Unsupported pseudo-class or pseudo-element".to_string(),
        };
        assert!(err.to_string().contains("a:hover"));

        let err = ExtractError::UnknownNode(NodeId::new(7));
        assert_eq!(err.to_string(), "Unknown node handle #7");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ExtractError = parse.unwrap_err().into();
        assert!(matches!(err, ExtractError::Json(_)));
    }
}
