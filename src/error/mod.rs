//! Error types and handling for Playslip
//!
//! Client-facing rejections carry one symbolic [`PlayErrorKind`] and are
//! translated into text by the message service at the boundary.
//! Everything else is an infrastructure failure that propagates as-is.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for Playslip operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a play was rejected at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayErrorKind {
    /// Referenced bet does not exist
    BetNotValid,
    /// Stake below the bet minimum
    BetNotValidMin,
    /// Stake above the bet maximum
    BetNotValidMax,
    /// Chosen option is not one of the bet's options
    ChoiceNotValid,
    /// Inside (or past) the pre-match closing window
    BetClosed,
}

impl PlayErrorKind {
    pub const ALL: [PlayErrorKind; 5] = [
        Self::BetNotValid,
        Self::BetNotValidMin,
        Self::BetNotValidMax,
        Self::ChoiceNotValid,
        Self::BetClosed,
    ];

    /// Message key used for localization
    pub fn key(&self) -> &'static str {
        match self {
            Self::BetNotValid => "BET_NOT_VALID",
            Self::BetNotValidMin => "BET_NOT_VALID_MIN",
            Self::BetNotValidMax => "BET_NOT_VALID_MAX",
            Self::ChoiceNotValid => "CHOICE_NOT_VALID",
            Self::BetClosed => "BET_CLOSED",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for PlayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error categories for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Client input rejected by play validation
    Validation,
    /// Database and storage errors
    Storage,
    /// Bet catalog and transport errors
    Network,
    /// Configuration and setup errors
    Configuration,
    /// Internal system errors
    Internal,
}

/// Playslip error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("Play rejected: {0}")]
    PlayRejected(PlayErrorKind),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Bet catalog error: {0}")]
    Catalog(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl From<PlayErrorKind> for Error {
    fn from(kind: PlayErrorKind) -> Self {
        Error::PlayRejected(kind)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(format!("Bet catalog request timed out: {}", err))
        } else {
            Error::Network(format!("HTTP request error: {}", err))
        }
    }
}

impl Error {
    /// Get a default error code for telemetry
    pub fn code(&self) -> &'static str {
        match self {
            Self::PlayRejected(_) => "E001",
            Self::Io(_) => "E002",
            Self::Serialization(_) => "E003",
            Self::Database(_) => "E004",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "E005",
            Self::Catalog(_) => "E006",
            Self::Network(_) => "E007",
            Self::Config(_) => "E008",
            Self::InvalidInput(_) => "E009",
            Self::Timeout(_) => "E010",
        }
    }

    /// Get the error category for monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PlayRejected(_) | Self::InvalidInput(_) => ErrorCategory::Validation,
            Self::Database(_) => ErrorCategory::Storage,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => ErrorCategory::Storage,
            Self::Catalog(_) | Self::Network(_) | Self::Timeout(_) => ErrorCategory::Network,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// The rejection kind, when this is a client-input error
    pub fn rejection(&self) -> Option<PlayErrorKind> {
        match self {
            Self::PlayRejected(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Whether a collaborator retry could succeed.
    ///
    /// Only advisory: nothing in the play service retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Storage
        )
    }
}
