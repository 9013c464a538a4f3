// yt-dlp subprocess backend for the MediaProvider seam

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, info, warn};
use regex::Regex;
use serde::Deserialize;
use time::macros::format_description;
use time::Date;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{
    ChannelMetadata, Container, PlaylistMetadata, Resolution, Variant, VideoMetadata, VideoSource,
};
use crate::downloader::traits::{MediaProvider, ProgressSink};
use crate::downloader::utils::run_output_with_timeout;

// Byte-level progress, one line per provider tick. NA fields are
// normal: live streams and some muxers never know the total.
const PROGRESS_TEMPLATE: &str =
    "download:[progress] %(progress.downloaded_bytes)s %(progress.total_bytes)s %(progress.total_bytes_estimate)s";

/// Provider backed by a local yt-dlp binary.
pub struct YtDlpProvider {
    binary: String,
    timeout_secs: u64,
}

impl YtDlpProvider {
    pub fn new() -> Self {
        Self {
            binary: find_ytdlp(),
            timeout_secs: 60,
        }
    }

    pub fn with_binary(mut self, path: impl Into<String>) -> Self {
        self.binary = path.into();
        self
    }

    /// Deadline for the one-shot JSON commands. Transfers themselves
    /// run until the binary exits.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    async fn dump_json(&self, url: &str, flat: bool) -> Result<Vec<u8>, DownloadError> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
        ];
        if flat {
            args.push("--flat-playlist".to_string());
        } else {
            args.push("--no-playlist".to_string());
        }
        args.push(url.to_string());

        debug!("[yt-dlp] {} {}", self.binary, args.join(" "));
        let output = run_output_with_timeout(&self.binary, &args, self.timeout_secs)
            .await
            .map_err(DownloadError::Provider)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::classify(&stderr));
        }
        Ok(output.stdout)
    }
}

impl Default for YtDlpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve_video(&self, url: &str) -> Result<VideoSource, DownloadError> {
        let raw = parse_video(&self.dump_json(url, false).await?)?;
        let variants: Vec<Variant> = raw.formats.iter().filter_map(RawFormat::variant).collect();
        info!(
            "[yt-dlp] resolved {} with {} selectable variants",
            url,
            variants.len()
        );
        Ok(VideoSource {
            title: raw.title.unwrap_or_else(|| "Unknown".to_string()),
            variants,
        })
    }

    async fn fetch(
        &self,
        url: &str,
        variant: &Variant,
        dest_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<(), DownloadError> {
        let dest = dest_dir.to_string_lossy().to_string();
        let args = [
            "-f",
            variant.id.as_str(),
            "--no-playlist",
            "--no-warnings",
            "--newline",
            "--progress-template",
            PROGRESS_TEMPLATE,
            "-P",
            dest.as_str(),
            url,
        ];

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DownloadError::Provider(format!("Failed to start {}: {}", self.binary, e))
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            DownloadError::Provider("Failed to capture yt-dlp stdout".to_string())
        })?;
        let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
            DownloadError::Provider("Failed to capture yt-dlp stderr".to_string())
        })?;
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr_pipe.read_to_string(&mut buf).await;
            buf
        });

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| DownloadError::Provider(format!("Failed to read progress: {}", e)))?
        {
            if let Some((total, remaining)) = parse_progress_line(&line) {
                progress.on_chunk(total, remaining);
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| DownloadError::Provider(format!("Failed to wait for yt-dlp: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            let stderr = stderr_task.await.unwrap_or_default();
            warn!("[yt-dlp] transfer failed for {}", url);
            Err(DownloadError::classify(&stderr))
        }
    }

    async fn playlist_items(&self, url: &str) -> Result<Vec<String>, DownloadError> {
        let raw = parse_playlist(&self.dump_json(url, true).await?)?;
        Ok(raw.entries.iter().filter_map(RawEntry::watch_url).collect())
    }

    async fn video_metadata(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
        let raw = parse_video(&self.dump_json(url, false).await?)?;
        Ok(VideoMetadata {
            title: raw.title.unwrap_or_else(|| "Unknown".to_string()),
            views: raw.view_count.unwrap_or(0),
            likes: raw.like_count,
            length_seconds: raw.duration.unwrap_or(0.0) as u64,
            rating: raw.average_rating,
            publish_date: raw.upload_date.as_deref().and_then(parse_compact_date),
            description: raw.description.unwrap_or_default(),
            channel_url: raw.channel_url.unwrap_or_default(),
            thumbnail_url: raw.thumbnail.unwrap_or_default(),
            author: raw.uploader.unwrap_or_else(|| "Unknown".to_string()),
            channel_id: raw.channel_id.unwrap_or_default(),
            keywords: raw.tags,
        })
    }

    async fn playlist_metadata(&self, url: &str) -> Result<PlaylistMetadata, DownloadError> {
        let raw = parse_playlist(&self.dump_json(url, true).await?)?;
        let total = raw.playlist_count.unwrap_or(raw.entries.len());
        let thumbnail_url = raw.first_thumbnail();
        Ok(PlaylistMetadata {
            title: raw.title.unwrap_or_else(|| "Unknown".to_string()),
            last_updated: raw.modified_date.as_deref().and_then(parse_compact_date),
            thumbnail_url,
            description: raw.description.unwrap_or_default(),
            total_videos: total,
            views: raw.view_count.unwrap_or(0),
            owner: raw
                .uploader
                .or(raw.channel)
                .unwrap_or_else(|| "Unknown".to_string()),
            owner_id: raw.uploader_id.or(raw.channel_id).unwrap_or_default(),
            owner_url: raw.uploader_url.or(raw.channel_url).unwrap_or_default(),
            playlist_id: raw.id.unwrap_or_default(),
        })
    }

    async fn channel_metadata(&self, url: &str) -> Result<ChannelMetadata, DownloadError> {
        // A channel URL flattens to the playlist of its uploads.
        let raw = parse_playlist(&self.dump_json(url, true).await?)?;
        let total = raw.playlist_count.unwrap_or(raw.entries.len());
        let thumbnail_url = raw.first_thumbnail();
        Ok(ChannelMetadata {
            name: raw
                .channel
                .or(raw.uploader)
                .or(raw.title)
                .unwrap_or_else(|| "Unknown".to_string()),
            channel_id: raw.channel_id.or(raw.uploader_id).unwrap_or_default(),
            last_updated: raw.modified_date.as_deref().and_then(parse_compact_date),
            thumbnail_url,
            description: raw.description.unwrap_or_default(),
            total_videos: total,
            views: raw.view_count.unwrap_or(0),
        })
    }
}

// Probe the usual install locations before trusting PATH.
fn find_ytdlp() -> String {
    let common_paths = [
        "/opt/homebrew/bin/yt-dlp",
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
    ];
    for path in common_paths {
        if Path::new(path).exists() {
            return path.to_string();
        }
    }
    "yt-dlp".to_string()
}

/// Parse one `--progress-template` line into `(total, remaining)`.
fn parse_progress_line(line: &str) -> Option<(u64, u64)> {
    lazy_static::lazy_static! {
        static ref PROGRESS_RE: Regex =
            Regex::new(r"^\[progress\]\s+(\d+)\s+(\S+)\s+(\S+)$").unwrap();
    }

    let caps = PROGRESS_RE.captures(line.trim())?;
    let downloaded: u64 = caps.get(1)?.as_str().parse().ok()?;
    let total = parse_byte_field(caps.get(2)?.as_str())
        .or_else(|| parse_byte_field(caps.get(3)?.as_str()))?;
    Some((total, total.saturating_sub(downloaded)))
}

// Totals come as integers, estimates as floats, unknowns as NA.
fn parse_byte_field(field: &str) -> Option<u64> {
    field.parse::<f64>().ok().map(|v| v as u64)
}

fn parse_compact_date(raw: &str) -> Option<Date> {
    let fmt = format_description!("[year][month][day]");
    Date::parse(raw, &fmt).ok()
}

fn parse_video(bytes: &[u8]) -> Result<RawVideo, DownloadError> {
    serde_json::from_slice(bytes).map_err(|e| {
        warn!("[yt-dlp] video JSON did not match the expected shape: {}", e);
        DownloadError::StructureChanged
    })
}

fn parse_playlist(bytes: &[u8]) -> Result<RawPlaylist, DownloadError> {
    serde_json::from_slice(bytes).map_err(|e| {
        warn!("[yt-dlp] playlist JSON did not match the expected shape: {}", e);
        DownloadError::StructureChanged
    })
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    ext: String,
    height: Option<u32>,
    vcodec: Option<String>,
    acodec: Option<String>,
    filesize: Option<u64>,
    filesize_approx: Option<u64>,
}

impl RawFormat {
    fn progressive(&self) -> bool {
        let has_video = self
            .vcodec
            .as_deref()
            .map_or(false, |v| v != "none" && !v.is_empty());
        let has_audio = self
            .acodec
            .as_deref()
            .map_or(false, |a| a != "none" && !a.is_empty());
        has_video && has_audio
    }

    /// Drop formats in containers the dropdown does not offer.
    fn variant(&self) -> Option<Variant> {
        let container = Container::from_ext(&self.ext)?;
        Some(Variant {
            id: self.format_id.clone(),
            resolution: self.height.and_then(Resolution::from_height),
            container,
            progressive: self.progressive(),
            size_bytes: self.filesize.or(self.filesize_approx),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    title: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
    view_count: Option<u64>,
    like_count: Option<u64>,
    duration: Option<f64>,
    average_rating: Option<f64>,
    upload_date: Option<String>,
    description: Option<String>,
    channel_url: Option<String>,
    thumbnail: Option<String>,
    uploader: Option<String>,
    channel_id: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    url: Option<String>,
    id: Option<String>,
}

impl RawEntry {
    fn watch_url(&self) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }
        self.id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/watch?v={}", id))
    }
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    title: Option<String>,
    id: Option<String>,
    #[serde(default)]
    entries: Vec<RawEntry>,
    modified_date: Option<String>,
    view_count: Option<u64>,
    playlist_count: Option<usize>,
    description: Option<String>,
    uploader: Option<String>,
    uploader_id: Option<String>,
    uploader_url: Option<String>,
    channel: Option<String>,
    channel_id: Option<String>,
    channel_url: Option<String>,
    #[serde(default)]
    thumbnails: Vec<RawThumbnail>,
}

impl RawPlaylist {
    fn first_thumbnail(&self) -> String {
        self.thumbnails
            .iter()
            .find_map(|t| t.url.clone())
            .unwrap_or_default()
    }
}
