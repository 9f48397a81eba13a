//! Error handling for the rental checkout client

use std::fmt;
use thiserror::Error;

use crate::address::AddressError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the rental checkout client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Local file errors from the persistent store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An address failed local validation
    #[error("{0}")]
    Validation(#[from] AddressError),

    /// The backend answered with `success: false` or a non-2xx status
    #[error("{0}")]
    Api(String),

    /// Client or gateway configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The payment gateway script or widget failed
    #[error("Payment gateway error: {0}")]
    Gateway(String),

    /// A confirm or pay action is already in flight
    #[error("Another request is already in progress")]
    Busy,

    /// The action is not allowed in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new backend error
    pub fn api<T: fmt::Display>(msg: T) -> Self {
        Error::Api(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new gateway error
    pub fn gateway<T: fmt::Display>(msg: T) -> Self {
        Error::Gateway(msg.to_string())
    }

    /// Create a new invalid state error
    pub fn invalid_state<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidState(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The text shown to the user for this error.
    ///
    /// Backend and validation errors carry a message meant for display and are
    /// returned as is; everything else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Validation(err) => err.to_string(),
            Error::Api(msg) | Error::Config(msg) | Error::Gateway(msg)
                if !msg.trim().is_empty() =>
            {
                msg.clone()
            }
            _ => fallback.to_string(),
        }
    }
}
