//! Twitter/X platform implementation
//!
//! Publishing is two sequential requests with no retry: upload the image to
//! the v1.1 media endpoint, then create a v2 tweet referencing it. An upload
//! can succeed while the tweet fails; the orphaned media id is logged and
//! returned in the error, nothing is cleaned up remotely.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::TwitterConfig;
use crate::error::{PlatformError, Result};
use crate::platforms::Platform;
use crate::types::{PlatformContent, PlatformId, Receipt};

pub mod client;
pub mod oauth;

pub use client::{Endpoints, TwitterClients};
pub use oauth::TwitterCredentials;

/// Twitter adapter
///
/// Holds the client bundle when initialization succeeded. A disabled adapter
/// (missing credentials, client build failure) keeps the reason and fails
/// every publish without touching the network.
pub struct TwitterPlatform {
    clients: Option<TwitterClients>,
    init_error: Option<PlatformError>,
}

impl TwitterPlatform {
    /// Create an adapter from explicit credentials and endpoints
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ClientInit` if the HTTP client cannot be built.
    pub fn new(credentials: TwitterCredentials, endpoints: &Endpoints) -> Result<Self> {
        let clients = TwitterClients::new(credentials, endpoints)?;
        Ok(Self {
            clients: Some(clients),
            init_error: None,
        })
    }

    /// Create an adapter from the `[twitter]` config table
    ///
    /// Never fails: initialization errors are logged and produce a disabled
    /// adapter so the other platforms can still publish.
    pub fn from_config(config: Option<&TwitterConfig>) -> Self {
        let result = credentials_from_config(config).and_then(|credentials| {
            let endpoints = config.map(endpoints_from_config).unwrap_or_default();
            TwitterClients::new(credentials, &endpoints)
        });

        match result {
            Ok(clients) => {
                info!("Twitter API clients initialized");
                Self {
                    clients: Some(clients),
                    init_error: None,
                }
            }
            Err(e) => {
                error!("Twitter adapter disabled: {}", e);
                Self::disabled(e)
            }
        }
    }

    /// An adapter that fails every publish with the given reason
    pub fn disabled(reason: PlatformError) -> Self {
        Self {
            clients: None,
            init_error: Some(reason),
        }
    }

    /// Why initialization failed, if it did
    pub fn init_error(&self) -> Option<&PlatformError> {
        self.init_error.as_ref()
    }
}

/// Read the four credentials, reporting the first one that is absent or blank
pub fn credentials_from_config(
    config: Option<&TwitterConfig>,
) -> std::result::Result<TwitterCredentials, PlatformError> {
    fn required<'a>(
        value: Option<&'a String>,
        key: &str,
    ) -> std::result::Result<&'a str, PlatformError> {
        value
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| PlatformError::MissingCredential(format!("twitter.{}", key)))
    }

    let config = config
        .ok_or_else(|| PlatformError::MissingCredential("twitter.api_key".to_string()))?;

    Ok(TwitterCredentials::new(
        required(config.api_key.as_ref(), "api_key")?,
        required(config.api_key_secret.as_ref(), "api_key_secret")?,
        required(config.access_token.as_ref(), "access_token")?,
        required(config.access_token_secret.as_ref(), "access_token_secret")?,
    ))
}

fn endpoints_from_config(config: &TwitterConfig) -> Endpoints {
    Endpoints {
        upload_base_url: config.upload_base_url().to_string(),
        api_base_url: config.api_base_url().to_string(),
        timeout: Duration::from_secs(config.timeout_secs()),
    }
}

#[async_trait]
impl Platform for TwitterPlatform {
    fn id(&self) -> PlatformId {
        PlatformId::Twitter
    }

    fn is_configured(&self) -> bool {
        self.clients.is_some()
    }

    async fn publish(&self, content: &PlatformContent<'_>) -> Result<Receipt> {
        let Some(clients) = &self.clients else {
            let reason = self
                .init_error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "client not initialized".to_string());
            error!("Twitter client not initialized, cannot publish: {}", reason);
            return Err(PlatformError::NotConfigured(format!("twitter: {}", reason)).into());
        };

        info!("Uploading '{}' to Twitter", content.image_path.display());
        let media_id = clients.media.upload(content.image_path).await?;
        info!(media_id = %media_id, "Media uploaded");

        match clients
            .tweets
            .create(content.caption, std::slice::from_ref(&media_id))
            .await
        {
            Ok(post_id) => {
                info!(post_id = %post_id, "Published to Twitter");
                Ok(Receipt {
                    post_id: Some(post_id),
                    media_id: Some(media_id),
                })
            }
            Err(e) => {
                warn!(
                    media_id = %media_id,
                    "Media was uploaded but the tweet was not created; media is orphaned"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn full_config() -> TwitterConfig {
        TwitterConfig {
            api_key: Some("key".to_string()),
            api_key_secret: Some("key-secret".to_string()),
            access_token: Some("token".to_string()),
            access_token_secret: Some("token-secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_credentials_from_full_config() {
        assert!(credentials_from_config(Some(&full_config())).is_ok());
    }

    #[test]
    fn test_missing_access_token() {
        let config = TwitterConfig {
            access_token: None,
            ..full_config()
        };

        let err = credentials_from_config(Some(&config)).unwrap_err();
        assert_eq!(
            err,
            PlatformError::MissingCredential("twitter.access_token".to_string())
        );
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let config = TwitterConfig {
            api_key_secret: Some("   ".to_string()),
            ..full_config()
        };

        let err = credentials_from_config(Some(&config)).unwrap_err();
        assert_eq!(
            err,
            PlatformError::MissingCredential("twitter.api_key_secret".to_string())
        );
    }

    #[test]
    fn test_missing_section() {
        let err = credentials_from_config(None).unwrap_err();
        assert!(matches!(err, PlatformError::MissingCredential(_)));
    }

    #[test]
    fn test_from_config_disabled_on_missing_credential() {
        let config = TwitterConfig {
            access_token_secret: None,
            ..full_config()
        };

        let platform = TwitterPlatform::from_config(Some(&config));
        assert!(!platform.is_configured());
        assert_eq!(
            platform.init_error(),
            Some(&PlatformError::MissingCredential(
                "twitter.access_token_secret".to_string()
            ))
        );
    }

    #[test]
    fn test_from_config_enabled() {
        let platform = TwitterPlatform::from_config(Some(&full_config()));
        assert!(platform.is_configured());
        assert!(platform.init_error().is_none());
        assert_eq!(platform.name(), "twitter");
    }

    #[tokio::test]
    async fn test_disabled_adapter_short_circuits() {
        let platform = TwitterPlatform::disabled(PlatformError::MissingCredential(
            "twitter.api_key".to_string(),
        ));

        let content = PlatformContent {
            image_path: Path::new("does-not-matter.jpg"),
            caption: "hello",
            title: None,
        };

        let err = platform.publish(&content).await.unwrap_err();
        assert!(err.to_string().contains("Platform not configured"));
        assert!(err.to_string().contains("twitter.api_key"));
    }
}
