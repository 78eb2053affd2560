use crate::llm::LlmError;

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;

/// Errors a single player action can run into.
///
/// None of these end the session; the action that produced one is simply
/// not applied.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Pack needs at least 2 distinct concepts, found {found}")]
    InsufficientConcepts { found: usize },

    #[error("Pack has no prompt templates")]
    MissingPrompts,

    #[error("Pack has no constraints")]
    MissingConstraints,

    #[error("Pack is invalid: {}", .0.join("; "))]
    PackValidation(Vec<String>),

    #[error("AI request failed: {0}")]
    RemoteCall(#[from] LlmError),

    #[error("AI answers are unavailable: no LLM provider configured")]
    LlmUnavailable,

    #[error("{0}")]
    InvalidAction(String),

    #[error("Pack storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

impl GameError {
    /// Stable error code sent to clients alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InsufficientConcepts { .. } => "INSUFFICIENT_CONCEPTS",
            GameError::MissingPrompts => "MISSING_PROMPTS",
            GameError::MissingConstraints => "MISSING_CONSTRAINTS",
            GameError::PackValidation(_) => "PACK_VALIDATION_FAILED",
            GameError::RemoteCall(_) => "REMOTE_CALL_FAILED",
            GameError::LlmUnavailable => "LLM_UNAVAILABLE",
            GameError::InvalidAction(_) => "INVALID_ACTION",
            GameError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
