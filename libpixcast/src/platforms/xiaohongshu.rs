//! Xiaohongshu (RED) placeholder
//!
//! Xiaohongshu offers no public API for individual developers. This adapter
//! performs no I/O and always reports success; nothing is actually delivered.
//! A real implementation would drive a browser session instead.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::Result;
use crate::platforms::Platform;
use crate::types::{PlatformContent, PlatformId, Receipt};

#[derive(Debug, Clone, Copy, Default)]
pub struct XiaohongshuPlatform;

impl XiaohongshuPlatform {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Platform for XiaohongshuPlatform {
    fn id(&self) -> PlatformId {
        PlatformId::Xiaohongshu
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn publish(&self, content: &PlatformContent<'_>) -> Result<Receipt> {
        warn!("Xiaohongshu has no public API; this publish is simulated and delivers nothing");
        info!(
            title = content.title.unwrap_or_default(),
            caption = content.caption,
            image = %content.image_path.display(),
            "(simulated) publishing to Xiaohongshu"
        );
        info!("(simulated) Xiaohongshu publish succeeded");

        Ok(Receipt::default())
    }
}
