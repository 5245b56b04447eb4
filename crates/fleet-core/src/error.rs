//! Error types for fleet-core.

use thiserror::Error;

/// Result type alias using fleet-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Fixed usage text listing every verb the interpreter accepts.
pub const USAGE: &str =
    "Invalid command. Use start, stop, status, list, retain, drop or list retain.";

/// Core error types for fleet operations
#[derive(Error, Debug)]
pub enum Error {
    // Boundary errors
    #[error("Invalid signing token")]
    Unauthorized,

    // Command errors
    #[error("{}", USAGE)]
    Usage,

    #[error("No instance found for '{alias}' (requested by {user})")]
    UnknownAlias { alias: String, user: String },

    #[error("Server *{0}* is not in the retained list.")]
    NotRetained(String),

    // External system errors
    #[error("{code}: {message}")]
    Gateway { code: String, message: String },

    #[error("Retained list storage failed: {0}")]
    Store(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a gateway error from a provider code and detail
    pub fn gateway(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Gateway {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an unknown-alias error
    pub fn unknown_alias(alias: impl Into<String>, user: impl Into<String>) -> Self {
        Self::UnknownAlias {
            alias: alias.into(),
            user: user.into(),
        }
    }

    /// Provider error code for gateway failures.
    ///
    /// Other errors report a generic code so listings stay one line per alias.
    pub fn code(&self) -> &str {
        match self {
            Error::Gateway { code, .. } => code,
            Error::Store(_) => "StoreError",
            Error::Unauthorized => "Unauthorized",
            _ => "InternalError",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
