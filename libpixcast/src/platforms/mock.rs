//! Mock platform implementation for testing
//!
//! A configurable in-process platform that can succeed, fail, or delay. Used
//! to exercise the dispatcher without credentials or network access.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;

use crate::error::{PlatformError, Result};
use crate::platforms::Platform;
use crate::types::{PlatformContent, PlatformId, Receipt};

/// Configuration for mock platform behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Platform this mock stands in for
    pub id: PlatformId,

    /// Whether publishing should succeed
    pub publish_succeeds: bool,

    /// Error to return on publish failure
    pub publish_error: Option<PlatformError>,

    /// Delay before completing publish (simulates network latency)
    pub delay: Duration,

    /// Whether the platform is configured
    pub is_configured: bool,

    /// Number of times publish has been called
    pub publish_call_count: Arc<Mutex<usize>>,

    /// Captions that have been published (for verification)
    pub published_captions: Arc<Mutex<Vec<String>>>,

    /// Start and end instant of every publish call
    pub publish_spans: Arc<Mutex<Vec<(Instant, Instant)>>>,
}

impl MockConfig {
    pub fn new(id: PlatformId) -> Self {
        Self {
            id,
            publish_succeeds: true,
            publish_error: None,
            delay: Duration::from_millis(0),
            is_configured: true,
            publish_call_count: Arc::new(Mutex::new(0)),
            published_captions: Arc::new(Mutex::new(Vec::new())),
            publish_spans: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock platform for testing
pub struct MockPlatform {
    config: MockConfig,
}

impl MockPlatform {
    /// Create a new mock platform with the given configuration
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Create a mock platform that always succeeds
    pub fn success(id: PlatformId) -> Self {
        Self::new(MockConfig::new(id))
    }

    /// Create a mock platform whose publish fails with the given error
    pub fn failure(id: PlatformId, error: PlatformError) -> Self {
        Self::new(MockConfig {
            publish_succeeds: false,
            publish_error: Some(error),
            ..MockConfig::new(id)
        })
    }

    /// Create a mock platform with a delay
    pub fn with_delay(id: PlatformId, delay: Duration) -> Self {
        Self::new(MockConfig {
            delay,
            ..MockConfig::new(id)
        })
    }

    /// Create a mock platform that is not configured
    pub fn not_configured(id: PlatformId) -> Self {
        Self::new(MockConfig {
            is_configured: false,
            ..MockConfig::new(id)
        })
    }

    /// Get the number of times publish was called
    pub fn publish_call_count(&self) -> usize {
        *self.config.publish_call_count.lock().unwrap()
    }

    /// Get all captions that were published
    pub fn published_captions(&self) -> Vec<String> {
        self.config.published_captions.lock().unwrap().clone()
    }

    /// Shared handle on the call counter, usable after the mock is boxed
    pub fn call_counter(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.config.publish_call_count)
    }

    /// Shared handle on the published captions, usable after the mock is boxed
    pub fn caption_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.config.published_captions)
    }

    /// Shared handle on the recorded publish spans, usable after the mock is boxed
    pub fn span_log(&self) -> Arc<Mutex<Vec<(Instant, Instant)>>> {
        Arc::clone(&self.config.publish_spans)
    }

    async fn simulate(&self, content: &PlatformContent<'_>) -> Result<Receipt> {
        if !self.config.is_configured {
            return Err(PlatformError::NotConfigured(self.name().to_string()).into());
        }

        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }

        if self.config.publish_succeeds {
            self.config
                .published_captions
                .lock()
                .unwrap()
                .push(content.caption.to_string());

            Ok(Receipt {
                post_id: Some(format!("{}:mock-{}", self.name(), uuid::Uuid::new_v4())),
                media_id: None,
            })
        } else {
            let error = self
                .config
                .publish_error
                .clone()
                .unwrap_or_else(|| PlatformError::Upload("Mock publish failed".to_string()));
            Err(error.into())
        }
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn id(&self) -> PlatformId {
        self.config.id
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured
    }

    async fn publish(&self, content: &PlatformContent<'_>) -> Result<Receipt> {
        let started = Instant::now();
        *self.config.publish_call_count.lock().unwrap() += 1;

        let result = self.simulate(content).await;

        self.config
            .publish_spans
            .lock()
            .unwrap()
            .push((started, Instant::now()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn content(caption: &str) -> PlatformContent<'_> {
        PlatformContent {
            image_path: Path::new("image.png"),
            caption,
            title: None,
        }
    }

    #[tokio::test]
    async fn test_mock_success() {
        let platform = MockPlatform::success(PlatformId::Twitter);

        assert!(platform.is_configured());
        assert_eq!(platform.name(), "twitter");

        let receipt = platform.publish(&content("Test content")).await.unwrap();
        assert!(receipt.post_id.unwrap().starts_with("twitter:mock-"));
        assert_eq!(platform.publish_call_count(), 1);
        assert_eq!(platform.published_captions(), vec!["Test content".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let platform = MockPlatform::failure(
            PlatformId::Twitter,
            PlatformError::Upload("Network error".to_string()),
        );

        let result = platform.publish(&content("Test")).await;
        assert!(result.unwrap_err().to_string().contains("Network error"));
        assert_eq!(platform.publish_call_count(), 1);
        assert!(platform.published_captions().is_empty());
    }

    #[tokio::test]
    async fn test_mock_with_delay() {
        let platform = MockPlatform::with_delay(PlatformId::Xiaohongshu, Duration::from_millis(50));

        let start = std::time::Instant::now();
        platform.publish(&content("Test")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_mock_not_configured() {
        let platform = MockPlatform::not_configured(PlatformId::Twitter);

        assert!(!platform.is_configured());
        let result = platform.publish(&content("Test")).await;
        assert!(result.unwrap_err().to_string().contains("not configured"));
    }
}
