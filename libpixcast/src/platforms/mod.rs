//! Platform abstraction and implementations
//!
//! Each platform adapter turns the dispatcher's abstract publish request into
//! the call sequence its remote side needs. Adapters report failures as
//! errors; the dispatcher decides what to do with them.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use libpixcast::platforms::{Platform, xiaohongshu::XiaohongshuPlatform};
//! use libpixcast::types::PlatformContent;
//!
//! # async fn example() -> libpixcast::error::Result<()> {
//! let platform = XiaohongshuPlatform::new();
//!
//! let content = PlatformContent {
//!     image_path: Path::new("sunflower_necklace.jpg"),
//!     caption: "小太阳",
//!     title: Some("OOTD"),
//! };
//!
//! if platform.is_configured() {
//!     let receipt = platform.publish(&content).await?;
//!     println!("Published to {}: {:?}", platform.name(), receipt.post_id);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{PlatformContent, PlatformId, Receipt};

pub mod twitter;
pub mod xiaohongshu;

// Mock platform is available for all builds (not just tests) to support integration tests
pub mod mock;

/// Unified interface over publish targets
#[async_trait]
pub trait Platform: Send + Sync {
    /// Which platform this adapter publishes to
    fn id(&self) -> PlatformId;

    /// Lowercase identifier, e.g. "twitter" or "xhs"
    fn name(&self) -> &str {
        self.id().as_str()
    }

    /// Whether the adapter is able to publish at all
    ///
    /// An unconfigured adapter still accepts `publish` calls but fails them
    /// without performing any I/O.
    fn is_configured(&self) -> bool;

    /// Publish one image with its caption
    ///
    /// # Errors
    ///
    /// Returns a `PlatformError` describing the first step that failed.
    async fn publish(&self, content: &PlatformContent<'_>) -> Result<Receipt>;
}
