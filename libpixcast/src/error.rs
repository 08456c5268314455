//! Error types for Pixcast

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PixcastError>;

#[derive(Error, Debug)]
pub enum PixcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PixcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PixcastError::InvalidInput(_) => 3,
            PixcastError::Platform(PlatformError::MissingCredential(_))
            | PixcastError::Platform(PlatformError::ClientInit(_)) => 2,
            PixcastError::Platform(_) => 1,
            PixcastError::Config(_) => 1,
        }
    }

    /// Media id left behind when the upload step succeeded but the post
    /// step did not
    pub fn orphaned_media_id(&self) -> Option<&str> {
        match self {
            PixcastError::Platform(PlatformError::PostCreation {
                orphaned_media_id, ..
            }) => orphaned_media_id.as_deref(),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Client initialization failed: {0}")]
    ClientInit(String),

    #[error("Platform not configured: {0}")]
    NotConfigured(String),

    #[error("Media file not found: {}", .0.display())]
    MediaNotFound(PathBuf),

    #[error("Media upload failed: {0}")]
    Upload(String),

    #[error("Post creation failed: {message}")]
    PostCreation {
        message: String,
        orphaned_media_id: Option<String>,
    },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}
