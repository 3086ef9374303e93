//! Custom error types for roombook
//!
//! Provides a unified error handling system across all modules. The booking
//! engine distinguishes portal unavailability (`NavigationTimeout`) from
//! logical failures (`ElementInteraction`, `Submission`), so the HTTP layer
//! can map each class to an appropriate response.

use thiserror::Error;

/// Main error type for roombook operations
#[derive(Error, Debug)]
pub enum RoombookError {
    /// Required configuration is missing or unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// A bounded navigation or network-idle wait exceeded its budget
    #[error("Booking portal timeout: {0}")]
    NavigationTimeout(String),

    /// Every candidate in a fallback chain failed for a required step
    #[error("Portal interaction failed: {0}")]
    ElementInteraction(String),

    /// No submit-button candidate succeeded
    #[error("Booking submission failed: {0}")]
    Submission(String),

    /// A request failed boundary validation before reaching the engine
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Browser automation errors outside the classified cases
    #[error("Browser error: {0}")]
    Browser(String),

    /// Chat passthrough errors
    #[error("Chat error: {0}")]
    Chat(String),

    /// agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for roombook operations
pub type Result<T> = std::result::Result<T, RoombookError>;

impl RoombookError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a navigation timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::NavigationTimeout(msg.into())
    }

    /// Create an element interaction error
    pub fn interaction(msg: impl Into<String>) -> Self {
        Self::ElementInteraction(msg.into())
    }

    /// Create a submission error
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Create an invalid request error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Whether this error means the portal could not be reached in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::NavigationTimeout(_))
    }
}
