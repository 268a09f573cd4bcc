use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeError {
    DatabaseError(String),
    StateTransitionError(String),
    OrchestrationError(String),
    ValidationError(String),
    ConfigurationError(String),
    NotFound(String),
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            IntakeError::StateTransitionError(msg) => write!(f, "State transition error: {msg}"),
            IntakeError::OrchestrationError(msg) => write!(f, "Orchestration error: {msg}"),
            IntakeError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            IntakeError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            IntakeError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for IntakeError {}

pub type Result<T> = std::result::Result<T, IntakeError>;
