//! Core types for Pixcast

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// Caption key for the Twitter post text
pub const TWITTER_CAPTION_KEY: &str = "twitter";
/// Caption key for the Xiaohongshu note body
pub const XHS_CAPTION_KEY: &str = "xhs_caption";
/// Caption key for the Xiaohongshu note title
pub const XHS_TITLE_KEY: &str = "xhs_title";

const DEFAULT_TWITTER_CAPTION: &str = "A beautiful image.";
const DEFAULT_XHS_CAPTION: &str = "一条好看的笔记～";
const DEFAULT_XHS_TITLE: &str = "一个不错的标题";

/// The closed set of platforms Pixcast knows how to publish to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Twitter,
    #[serde(rename = "xhs")]
    Xiaohongshu,
}

impl PlatformId {
    pub const ALL: [PlatformId; 2] = [PlatformId::Twitter, PlatformId::Xiaohongshu];

    /// Canonical lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Xiaohongshu => "xhs",
        }
    }
}

impl FromStr for PlatformId {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "x" => Ok(Self::Twitter),
            "xhs" | "xiaohongshu" => Ok(Self::Xiaohongshu),
            _ => Err(PlatformError::UnsupportedPlatform(s.to_string())),
        }
    }
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-platform caption text, keyed by caption key
///
/// Keys that are absent fall back to a fixed default. A key that is present
/// with an empty value is used as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captions(HashMap<String, String>);

impl Captions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(key.into(), text.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.0.insert(key.into(), text.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Resolve the caption (and title, where the platform has one) for a platform
    pub fn for_platform(&self, platform: PlatformId) -> (&str, Option<&str>) {
        match platform {
            PlatformId::Twitter => (self.get_or(TWITTER_CAPTION_KEY, DEFAULT_TWITTER_CAPTION), None),
            PlatformId::Xiaohongshu => (
                self.get_or(XHS_CAPTION_KEY, DEFAULT_XHS_CAPTION),
                Some(self.get_or(XHS_TITLE_KEY, DEFAULT_XHS_TITLE)),
            ),
        }
    }
}

impl From<HashMap<String, String>> for Captions {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

/// One publish invocation: an image, its captions and the target platforms
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub image_path: PathBuf,
    pub captions: Captions,
    /// Platform identifiers as given by the caller, possibly unrecognized
    pub platforms: Vec<String>,
}

impl PublishRequest {
    pub fn new(image_path: impl Into<PathBuf>, captions: Captions, platforms: Vec<String>) -> Self {
        Self {
            image_path: image_path.into(),
            captions,
            platforms,
        }
    }
}

/// The slice of a request a single platform adapter sees
#[derive(Debug, Clone, Copy)]
pub struct PlatformContent<'a> {
    pub image_path: &'a Path,
    pub caption: &'a str,
    pub title: Option<&'a str>,
}

impl<'a> PlatformContent<'a> {
    pub fn from_request(request: &'a PublishRequest, platform: PlatformId) -> Self {
        let (caption, title) = request.captions.for_platform(platform);
        Self {
            image_path: &request.image_path,
            caption,
            title,
        }
    }
}

/// Outcome of a successful publish to one platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Platform-specific post id, `None` for simulated publishes
    pub post_id: Option<String>,
    /// Media handle the post references, if media was uploaded
    pub media_id: Option<String>,
}

/// Supported image MIME types for uploads
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImageMimeType {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl ImageMimeType {
    /// Detect MIME type from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detect MIME type from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }
}

impl std::fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
