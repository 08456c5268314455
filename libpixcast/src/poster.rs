//! Multi-platform publish orchestration
//!
//! [`MultiPlatformPoster`] fans one [`PublishRequest`] out to the requested
//! platforms, strictly one after another, and collects one [`PostResult`] per
//! recognized platform. Platform failures never propagate: they are logged,
//! reported on the event bus and recorded as failed results.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::PlatformError;
use crate::events::{Event, EventBus, EventReceiver};
use crate::platforms::{twitter::TwitterPlatform, xiaohongshu::XiaohongshuPlatform, Platform};
use crate::types::{PlatformContent, PlatformId, PublishRequest};

/// Result of publishing to a single platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResult {
    pub platform: PlatformId,
    pub success: bool,
    /// Platform-specific post ID (if successful and not simulated)
    pub platform_post_id: Option<String>,
    /// Uploaded media. On failure, set only when the media was orphaned.
    pub media_id: Option<String>,
    /// Error message (if failed)
    pub error: Option<String>,
}

/// Aggregate outcome of one [`MultiPlatformPoster::post`] call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReport {
    pub request_id: String,
    /// One entry per distinct recognized platform, in request order
    pub results: Vec<PostResult>,
    /// Requested identifiers that name no known platform, in request order
    pub unsupported: Vec<String>,
}

impl PublishReport {
    /// Platform name to success flag
    pub fn outcomes(&self) -> HashMap<String, bool> {
        self.results
            .iter()
            .map(|r| (r.platform.to_string(), r.success))
            .collect()
    }

    /// Success flag for one platform, `None` if it was not requested
    pub fn outcome(&self, platform: PlatformId) -> Option<bool> {
        self.results
            .iter()
            .find(|r| r.platform == platform)
            .map(|r| r.success)
    }

    /// True when every recognized platform succeeded and none were unsupported
    pub fn all_succeeded(&self) -> bool {
        self.unsupported.is_empty() && self.results.iter().all(|r| r.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PostResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Dispatcher over a fixed set of platform adapters
pub struct MultiPlatformPoster {
    platforms: Vec<Box<dyn Platform>>,
    event_bus: EventBus,
}

impl MultiPlatformPoster {
    /// Create a poster with its own event bus
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libpixcast::{create_platforms, Config, MultiPlatformPoster};
    ///
    /// # fn example() -> libpixcast::Result<()> {
    /// let config = Config::load()?;
    /// let poster = MultiPlatformPoster::new(create_platforms(&config));
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(platforms: Vec<Box<dyn Platform>>) -> Self {
        Self::with_event_bus(platforms, EventBus::default())
    }

    /// Create a poster that reports on an existing event bus
    pub fn with_event_bus(platforms: Vec<Box<dyn Platform>>, event_bus: EventBus) -> Self {
        Self {
            platforms,
            event_bus,
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    /// The registered adapter for a platform, if any
    pub fn platform(&self, id: PlatformId) -> Option<&dyn Platform> {
        self.platforms
            .iter()
            .find(|p| p.id() == id)
            .map(|p| p.as_ref())
    }

    /// Publish the request to every platform it names
    ///
    /// Platforms are visited in request order and each finishes before the
    /// next starts. Repeated identifiers (including aliases) publish once.
    /// Unrecognized identifiers are reported in
    /// [`PublishReport::unsupported`]; they are not an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libpixcast::{Captions, MultiPlatformPoster, PublishRequest};
    ///
    /// # async fn example(poster: MultiPlatformPoster) {
    /// let request = PublishRequest::new(
    ///     "sunflower_necklace.jpg",
    ///     Captions::new().with("twitter", "Sunflower pendant 🌻"),
    ///     vec!["twitter".to_string(), "xhs".to_string()],
    /// );
    ///
    /// let report = poster.post(&request).await;
    /// for (platform, success) in report.outcomes() {
    ///     println!("{}: {}", platform, success);
    /// }
    /// # }
    /// ```
    pub async fn post(&self, request: &PublishRequest) -> PublishReport {
        let request_id = uuid::Uuid::new_v4().to_string();
        info!("Starting publish to platforms: {:?}", request.platforms);

        self.event_bus.emit(Event::PublishStarted {
            request_id: request_id.clone(),
            platforms: request.platforms.clone(),
        });

        let mut results = Vec::new();
        let mut unsupported: Vec<String> = Vec::new();
        let mut seen: HashSet<PlatformId> = HashSet::new();

        for name in &request.platforms {
            let id = match name.parse::<PlatformId>() {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping '{}': {}", name, e);
                    if !unsupported.contains(name) {
                        unsupported.push(name.clone());
                        self.event_bus.emit(Event::PlatformUnsupported {
                            request_id: request_id.clone(),
                            name: name.clone(),
                        });
                    }
                    continue;
                }
            };

            if !seen.insert(id) {
                continue;
            }

            let result = self.publish_to(id, request).await;
            self.report(&request_id, &result);
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = results.len() - succeeded;
        info!(
            succeeded,
            failed,
            unsupported = unsupported.len(),
            "All publish tasks finished"
        );

        self.event_bus.emit(Event::PublishCompleted {
            request_id: request_id.clone(),
            succeeded,
            failed,
            unsupported: unsupported.len(),
        });

        PublishReport {
            request_id,
            results,
            unsupported,
        }
    }

    async fn publish_to(&self, id: PlatformId, request: &PublishRequest) -> PostResult {
        let Some(platform) = self.platform(id) else {
            let error = PlatformError::NotConfigured(format!("no adapter registered for {}", id));
            warn!("Failed to publish to {}: {}", id, error);
            return PostResult {
                platform: id,
                success: false,
                platform_post_id: None,
                media_id: None,
                error: Some(error.to_string()),
            };
        };

        info!("Publishing to platform: {}", id);
        let content = PlatformContent::from_request(request, id);

        match platform.publish(&content).await {
            Ok(receipt) => {
                info!("Successfully published to {}", id);
                PostResult {
                    platform: id,
                    success: true,
                    platform_post_id: receipt.post_id,
                    media_id: receipt.media_id,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Failed to publish to {}: {}", id, e);
                PostResult {
                    platform: id,
                    success: false,
                    platform_post_id: None,
                    media_id: e.orphaned_media_id().map(str::to_string),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn report(&self, request_id: &str, result: &PostResult) {
        let event = if result.success {
            Event::PlatformSucceeded {
                request_id: request_id.to_string(),
                platform: result.platform,
                post_id: result.platform_post_id.clone(),
            }
        } else {
            Event::PlatformFailed {
                request_id: request_id.to_string(),
                platform: result.platform,
                error: result.error.clone().unwrap_or_default(),
                orphaned_media_id: result.media_id.clone(),
            }
        };
        self.event_bus.emit(event);
    }
}

/// Build one adapter per known platform from configuration
///
/// The Twitter adapter is created disabled when its credentials are
/// incomplete; that is logged, not returned as an error.
pub fn create_platforms(config: &Config) -> Vec<Box<dyn Platform>> {
    vec![
        Box::new(TwitterPlatform::from_config(config.twitter.as_ref())),
        Box::new(XiaohongshuPlatform::new()),
    ]
}
