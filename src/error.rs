//! Error types for the hanime-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // Source URL errors
    #[error("Invalid episode URL: {0}")]
    InvalidUrl(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    // Stream selection errors
    #[error("No guest-accessible stream: {0}")]
    NoAccessibleStream(String),

    // Manifest errors
    #[error("Manifest fetch failed: {0}")]
    ManifestFetch(String),

    #[error("Missing decryption key in playlist")]
    MissingDecryptionKey,

    #[error("Decryption error: {0}")]
    Decryption(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// Fatal error or interrupt.
    pub const FAILURE: i32 = 1;
}
