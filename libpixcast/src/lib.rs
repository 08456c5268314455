//! Pixcast - publish one image to several social platforms
//!
//! This library loads platform credentials, builds per-platform adapters and
//! fans a single publish request out across them, collecting one result per
//! platform.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod platforms;
pub mod poster;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{PixcastError, PlatformError, Result};
pub use poster::{create_platforms, MultiPlatformPoster, PostResult, PublishReport};
pub use types::{Captions, PlatformId, PublishRequest};
