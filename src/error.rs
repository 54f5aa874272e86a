//! Error types for the twitter-media-dl application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Download of {url} failed after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    // Media errors
    #[error("Malformed media on post {post_id}: {reason}")]
    MalformedMedia { post_id: u64, reason: String },

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

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

impl Error {
    /// Whether this error belongs to the configuration class (fatal at startup).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_)
        )
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_SOURCES_FAILED: i32 = 6;
}
