//! pix-post - Publish one image to several platforms

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use libpixcast::logging::LoggingConfig;
use libpixcast::types::{TWITTER_CAPTION_KEY, XHS_CAPTION_KEY, XHS_TITLE_KEY};
use libpixcast::{
    create_platforms, Captions, Config, MultiPlatformPoster, PixcastError, PublishReport,
    PublishRequest,
};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "pix-post")]
#[command(version, about = "Publish an image with per-platform captions")]
#[command(long_about = r#"Publish one image, with per-platform captions, to Twitter/X and Xiaohongshu.

EXAMPLES:
    # Publish to the default platforms from the config file
    pix-post sunflower_necklace.jpg --twitter-caption "Sunflower season 🌻"

    # Twitter only
    pix-post ~/Pictures/photo.png -p twitter

    # Xiaohongshu with a title and note body
    pix-post photo.jpg -p xhs --xhs-title "OOTD" --xhs-caption "今天的穿搭"

    # JSON summary for scripting
    pix-post photo.jpg --format json | jq '.results[] | select(.success == false)'

PLATFORMS:
    twitter (alias: x)
    xhs     (alias: xiaohongshu; simulated, nothing is delivered)

CONFIGURATION:
    --config PATH, then $PIXCAST_CONFIG, then ~/.config/pixcast/config.toml

EXIT CODES:
    0 - Every requested platform succeeded
    1 - A platform failed, or the configuration could not be loaded
    3 - Invalid input (unknown platform name or output format)
"#)]
struct Cli {
    /// Image file to publish
    #[arg(value_name = "IMAGE", default_value = "sunflower_necklace.jpg")]
    image: String,

    /// Target platform(s), comma-separated
    #[arg(short, long, value_name = "PLATFORMS")]
    #[arg(help = "Target platform(s), comma-separated (default: [defaults] platforms from config)")]
    platform: Option<String>,

    /// Post text for Twitter/X
    #[arg(long, value_name = "TEXT")]
    twitter_caption: Option<String>,

    /// Note title for Xiaohongshu
    #[arg(long, value_name = "TEXT")]
    xhs_title: Option<String>,

    /// Note body for Xiaohongshu
    #[arg(long, value_name = "TEXT")]
    xhs_caption: Option<String>,

    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = PixcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(PixcastError::InvalidInput(format!(
                "Invalid output format '{}': expected 'text' or 'json'",
                s
            ))),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.verbose).init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            let code = e
                .downcast_ref::<PixcastError>()
                .map(PixcastError::exit_code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let format: OutputFormat = cli.format.parse()?;

    let config = match &cli.config {
        Some(path) => Config::load_from_path(&expand_path(path))?,
        None => Config::load()?,
    };

    let platforms = match &cli.platform {
        Some(list) => parse_platform_list(list),
        None => config.defaults.platforms.clone(),
    };
    debug!(?platforms, "Resolved target platforms");

    let mut captions = Captions::new();
    if let Some(text) = cli.twitter_caption {
        captions.insert(TWITTER_CAPTION_KEY, text);
    }
    if let Some(text) = cli.xhs_title {
        captions.insert(XHS_TITLE_KEY, text);
    }
    if let Some(text) = cli.xhs_caption {
        captions.insert(XHS_CAPTION_KEY, text);
    }

    let request = PublishRequest::new(expand_path(&cli.image), captions, platforms);
    let poster = MultiPlatformPoster::new(create_platforms(&config));
    let report = poster.post(&request).await;

    match format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize publish report")?;
            println!("{}", json);
        }
    }

    Ok(exit_code_for(&report))
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Split a comma-separated platform list, dropping empty entries
fn parse_platform_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn render_text(report: &PublishReport) -> String {
    let mut out = String::from("--- Publish summary ---\n");
    for result in &report.results {
        let status = if result.success {
            "success".to_string()
        } else {
            format!(
                "failure ({})",
                result.error.as_deref().unwrap_or("unknown error")
            )
        };
        out.push_str(&format!("Platform '{}': {}\n", result.platform, status));
    }
    for name in &report.unsupported {
        out.push_str(&format!("Platform '{}': unsupported\n", name));
    }
    out
}

/// Failures outrank unsupported names
fn exit_code_for(report: &PublishReport) -> i32 {
    if report.failures().next().is_some() {
        1
    } else if !report.unsupported.is_empty() {
        3
    } else {
        0
    }
}
