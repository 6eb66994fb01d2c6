//! Common error types for Keyward components.

use thiserror::Error;

/// Common errors across Keyward components
#[derive(Debug, Error)]
pub enum KeywardError {
    /// No action flag was selected
    #[error("No command specified")]
    NoCommandSpecified,

    /// More than one action flag was selected
    #[error("Only a single command is allowed")]
    MultipleCommandsSpecified,

    /// Relay factor outside the allowed range
    #[error("Invalid relay factor: {0} (allowed range is 0-5)")]
    InvalidRelayFactor(i64),

    /// local-only combined with a command that must reach every pool
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// The cluster agent could not be reached at all
    #[error("Transport error: {0}")]
    Transport(String),

    /// The cluster agent rejected the request
    #[error("Agent error {status}: {message}")]
    Api { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KeywardError {
    /// Returns true if this error was raised before any network interaction
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoCommandSpecified
                | Self::MultipleCommandsSpecified
                | Self::InvalidRelayFactor(_)
                | Self::InvalidScope(_)
        )
    }
}
