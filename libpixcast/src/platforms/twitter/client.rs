//! Thin clients for the two Twitter API generations Pixcast needs
//!
//! - [`MediaClient`] talks to the legacy v1.1 media upload endpoint.
//! - [`TweetClient`] talks to the v2 tweets endpoint.
//!
//! Both sign with the same OAuth 1.0a user-context credentials and share one
//! `reqwest::Client`. [`TwitterClients`] bundles them into the handle the
//! adapter owns.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use tracing::debug;

use super::oauth::{OAuth1Signer, TwitterCredentials};
use crate::error::{PlatformError, Result};
use crate::types::ImageMimeType;

/// Largest image the v1.1 simple upload accepts
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

const MEDIA_UPLOAD_PATH: &str = "/1.1/media/upload.json";
const TWEETS_PATH: &str = "/2/tweets";

/// Base URLs and timeout for the Twitter endpoints
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub upload_base_url: String,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            upload_base_url: crate::config::DEFAULT_UPLOAD_BASE_URL.to_string(),
            api_base_url: crate::config::DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<TweetMedia<'a>>,
}

#[derive(Debug, Serialize)]
struct TweetMedia<'a> {
    media_ids: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

/// v1.1 media upload client
#[derive(Debug)]
pub struct MediaClient {
    http: Client,
    signer: Arc<OAuth1Signer>,
    url: String,
}

impl MediaClient {
    /// Upload an image file and return its media id
    ///
    /// # Errors
    ///
    /// - `PlatformError::MediaNotFound` if the file does not exist
    /// - `PlatformError::Upload` for everything else: unreadable or oversized
    ///   files, unsupported extensions, transport failures, non-2xx
    ///   responses, unparsable bodies
    pub async fn upload(&self, image_path: &Path) -> Result<String> {
        let file = tokio::fs::File::open(image_path)
            .await
            .map_err(|e| read_error(image_path, e))?;

        let mime = ImageMimeType::from_path(image_path).ok_or_else(|| {
            PlatformError::Upload(format!(
                "Unsupported image type for {} (expected jpg, png, gif or webp)",
                image_path.display()
            ))
        })?;

        let declared_len = file
            .metadata()
            .await
            .map_err(|e| read_error(image_path, e))?
            .len();
        if declared_len > MAX_IMAGE_BYTES {
            return Err(too_large(declared_len).into());
        }

        // Metadata can under-report for special files; the read stays bounded.
        let mut bytes = Vec::with_capacity(declared_len as usize);
        file.take(MAX_IMAGE_BYTES + 1)
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| read_error(image_path, e))?;
        if bytes.len() as u64 > MAX_IMAGE_BYTES {
            return Err(too_large(bytes.len() as u64).into());
        }

        let file_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_str())
            .map_err(|e| PlatformError::Upload(format!("Failed to build form part: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("media", part);

        debug!(url = %self.url, mime = %mime, "Uploading media");

        let response = self
            .http
            .post(&self.url)
            .header(
                reqwest::header::AUTHORIZATION,
                self.signer.authorization_header("POST", &self.url, &[]),
            )
            .multipart(form)
            .send()
            .await
            .map_err(|e| PlatformError::Upload(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Upload(format!("HTTP {}: {}", status.as_u16(), body)).into());
        }

        let parsed: MediaUploadResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::Upload(format!("Unexpected response body: {}", e)))?;

        Ok(parsed.media_id_string)
    }
}

/// v2 post creation client
#[derive(Debug)]
pub struct TweetClient {
    http: Client,
    signer: Arc<OAuth1Signer>,
    url: String,
}

impl TweetClient {
    /// Create a tweet and return its id
    ///
    /// Every failure is reported as `PlatformError::PostCreation` carrying the
    /// media id that is now unreferenced. Rate limiting, auth rejection and
    /// network errors are not told apart.
    pub async fn create(&self, text: &str, media_ids: &[String]) -> Result<String> {
        let orphaned = || media_ids.first().cloned();
        let failure = |message: String| PlatformError::PostCreation {
            message,
            orphaned_media_id: orphaned(),
        };

        let body = CreateTweetRequest {
            text,
            media: (!media_ids.is_empty()).then_some(TweetMedia { media_ids }),
        };

        debug!(url = %self.url, media = media_ids.len(), "Creating tweet");

        let response = self
            .http
            .post(&self.url)
            .header(
                reqwest::header::AUTHORIZATION,
                self.signer.authorization_header("POST", &self.url, &[]),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| failure(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failure(format!("HTTP {}: {}", status.as_u16(), body)).into());
        }

        let parsed: CreateTweetResponse = response
            .json()
            .await
            .map_err(|e| failure(format!("Unexpected response body: {}", e)))?;

        Ok(parsed.data.id)
    }
}

/// Both sub-clients, built from one set of credentials
#[derive(Debug)]
pub struct TwitterClients {
    pub media: MediaClient,
    pub tweets: TweetClient,
}

impl TwitterClients {
    /// # Errors
    ///
    /// Returns `PlatformError::ClientInit` if the HTTP client cannot be built.
    pub fn new(
        credentials: TwitterCredentials,
        endpoints: &Endpoints,
    ) -> std::result::Result<Self, PlatformError> {
        let http = Client::builder()
            .timeout(endpoints.timeout)
            .build()
            .map_err(|e| PlatformError::ClientInit(format!("Failed to build HTTP client: {}", e)))?;

        let signer = Arc::new(OAuth1Signer::new(credentials));

        Ok(Self {
            media: MediaClient {
                http: http.clone(),
                signer: Arc::clone(&signer),
                url: join_url(&endpoints.upload_base_url, MEDIA_UPLOAD_PATH),
            },
            tweets: TweetClient {
                http,
                signer,
                url: join_url(&endpoints.api_base_url, TWEETS_PATH),
            },
        })
    }
}

fn read_error(image_path: &Path, e: std::io::Error) -> PlatformError {
    if e.kind() == std::io::ErrorKind::NotFound {
        PlatformError::MediaNotFound(image_path.to_path_buf())
    } else {
        PlatformError::Upload(format!("Failed to read {}: {}", image_path.display(), e))
    }
}

fn too_large(len: u64) -> PlatformError {
    PlatformError::Upload(format!(
        "Image is {} bytes, larger than the {} byte limit",
        len, MAX_IMAGE_BYTES
    ))
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn unreachable_clients() -> TwitterClients {
        let endpoints = Endpoints {
            upload_base_url: "http://127.0.0.1:9".to_string(),
            api_base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        };
        TwitterClients::new(TwitterCredentials::new("k", "ks", "t", "ts"), &endpoints).unwrap()
    }

    #[tokio::test]
    async fn test_upload_rejects_sparse_oversized_file_from_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge.jpg");
        // 1 GiB of holes: only metadata is consulted before rejecting
        std::fs::File::create(&path)
            .unwrap()
            .set_len(1 << 30)
            .unwrap();

        let err = unreachable_clients().media.upload(&path).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Platform error: Media upload failed: Image is 1073741824 bytes, larger than the 5242880 byte limit"
        );
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_media_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing");

        let err = unreachable_clients().media.upload(&path).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::PixcastError::Platform(PlatformError::MediaNotFound(_))
        ));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://api.twitter.com/", TWEETS_PATH),
            "https://api.twitter.com/2/tweets"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8080", MEDIA_UPLOAD_PATH),
            "http://127.0.0.1:8080/1.1/media/upload.json"
        );
    }

    #[test]
    fn test_create_tweet_body_with_media() {
        let ids = vec!["710511363345354753".to_string()];
        let body = CreateTweetRequest {
            text: "hello",
            media: Some(TweetMedia { media_ids: &ids }),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "text": "hello",
                "media": { "media_ids": ["710511363345354753"] }
            })
        );
    }

    #[test]
    fn test_create_tweet_body_without_media() {
        let body = CreateTweetRequest {
            text: "hello",
            media: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "hello" }));
    }
}
