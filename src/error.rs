//! Error types for the turn engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MtgError {
    /// A supplied decision or action breaks a rule. The state it was applied
    /// to is left untouched and the caller may retry with another decision.
    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    /// An invariant that a correctly driven game never breaks. Not recoverable.
    #[error("Corrupted game state: {0}")]
    CorruptState(String),

    #[error("Controller is not waiting for a decision")]
    NotWaitingForDecision,

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MtgError {
    /// Shorthand for building an [`MtgError::InvalidAction`]
    pub fn invalid(message: impl Into<String>) -> Self {
        MtgError::InvalidAction(message.into())
    }

    /// True for errors that indicate a bug in state construction rather than
    /// a bad decision
    pub fn is_fatal(&self) -> bool {
        matches!(self, MtgError::CorruptState(_))
    }
}

pub type Result<T> = std::result::Result<T, MtgError>;
